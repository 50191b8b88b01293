//! Listing, search, and pagination helpers.

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default number of records per page.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Maximum number of records per page.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Clamp a user-provided limit into `1..=max`. Missing, zero, and negative
/// values fall back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    match limit {
        Some(l) if l > 0 => l.min(max),
        _ => default,
    }
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Query helpers
// ---------------------------------------------------------------------------

/// Build an `ILIKE` substring pattern, escaping the wildcard characters so a
/// search for `50%` does not match everything.
pub fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Normalise an optional query string filter: blank values count as absent.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
