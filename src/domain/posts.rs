//! The post entity, its creation invariants, and storage-key composition.

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::FormatItem, macros::format_description};

use crate::domain::error::DomainError;
use crate::domain::slug::slug_or_fallback;

/// ISO-8601 rendering with a fixed three-digit fraction and `Z` suffix.
///
/// Keys embed this rendering as their prefix; the constant fraction width is
/// what keeps keys lexicographically ordered by creation time. A variable
/// width would misorder at the fraction/suffix boundary (`.5Z` vs `.51Z`).
pub const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");

/// A published blog post as persisted in the blob store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub author: String,
    #[serde(with = "timestamp")]
    pub created_at: OffsetDateTime,
}

/// Check the creation preconditions shared by every publishing surface.
///
/// Only the empty string fails; whitespace-only values are accepted.
pub fn validate_draft(title: &str, body: &str) -> Result<(), DomainError> {
    if title.is_empty() || body.is_empty() {
        return Err(DomainError::validation("title and body are required"));
    }
    Ok(())
}

/// Current UTC time truncated to millisecond precision, so the formatted
/// value survives a parse round-trip unchanged.
pub fn now_millis() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    let nanos = now.nanosecond();
    now.replace_nanosecond(nanos - nanos % 1_000_000).unwrap_or(now)
}

/// Render a timestamp in the fixed-width key format.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    at.to_offset(time::UtcOffset::UTC)
        .format(TIMESTAMP_FORMAT)
        .expect("valid timestamp")
}

/// Compose the storage key for a post: `<createdAt>-<slug>`.
///
/// No uniqueness probing: two posts created in the same millisecond with the
/// same slug share a key and the later write wins.
pub fn post_key(created_at: OffsetDateTime, title: &str) -> String {
    format!(
        "{}-{}",
        format_timestamp(created_at),
        slug_or_fallback(title)
    )
}

/// Serde codec for `createdAt`: writes the fixed-width rendering and accepts
/// any RFC 3339 rendering on input.
pub mod timestamp {
    use serde::de::Error as DeError;
    use serde::{Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;
    use time::format_description::well_known::Rfc3339;

    pub fn serialize<S>(at: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(*at))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        OffsetDateTime::parse(&raw, &Rfc3339).map_err(D::Error::custom)
    }
}
