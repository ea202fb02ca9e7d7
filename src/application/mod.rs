//! Application services layer scaffolding.

pub mod error;
pub mod posts;
pub mod store;
