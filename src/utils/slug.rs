//! URL slug helpers.
//!
//! Project identifiers and certificate file names end up in URLs, so they are
//! reduced to lowercase ASCII words joined by `-`.

use deunicode::deunicode;
use regex::Regex;
use std::sync::LazyLock;

/// ASCII whitespace runs, collapsed to a single `-` in certificate file names.
///
/// `(?-u:...)` keeps the class ASCII so the pattern compiles without the
/// `unicode-perl` feature.
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\s)+").expect("valid regex"));

/// Convert free text to a URL slug.
///
/// Transliterates to ASCII, lowercases, keeps `[a-z0-9]`, and joins the
/// remaining words with single dashes.
///
/// `"Jungle.Baby - Kids Activity"` → `"jungle-baby-kids-activity"`
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text).to_ascii_lowercase();
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// True when `slug` is already in the form [`slugify`] produces.
pub fn is_url_safe(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Lowercase with whitespace runs replaced by `-`; other characters kept.
///
/// `"AWS Certified  Cloud"` → `"aws-certified-cloud"`
pub fn dash_whitespace(text: &str) -> String {
    WHITESPACE_RUN
        .replace_all(&text.to_lowercase(), "-")
        .into_owned()
}
