//! Slug normalization for storage keys.
//!
//! Titles are reduced to the `[a-z0-9-]` alphabet without transliteration:
//! after lowercasing, every maximal run of characters outside `[a-z0-9]`
//! collapses into a single `-`, and boundary dashes are stripped.

/// Fallback slug used when a title yields no alphanumeric characters.
pub const FALLBACK_SLUG: &str = "post";

/// Normalize a human-supplied title into a URL-safe slug.
///
/// May return an empty string; callers that need a non-empty slug should go
/// through [`slug_or_fallback`].
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_separator = false;

    for ch in input.trim().chars() {
        for lower in ch.to_lowercase() {
            if lower.is_ascii_lowercase() || lower.is_ascii_digit() {
                if pending_separator && !slug.is_empty() {
                    slug.push('-');
                }
                pending_separator = false;
                slug.push(lower);
            } else {
                pending_separator = true;
            }
        }
    }

    slug
}

/// Normalize a title, substituting [`FALLBACK_SLUG`] when nothing survives.
pub fn slug_or_fallback(input: &str) -> String {
    let slug = slugify(input);
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}
