//! Foglio: a minimal blog publishing endpoint backed by a key/value blob store.
//!
//! Two operations: publish a post (authenticated by a shared admin token
//! supplied in the request body) and list stored posts newest-first. Storage
//! keys are `<ISO-8601 createdAt>-<slug>` so they sort by creation time as
//! plain text.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
