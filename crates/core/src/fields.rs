//! Field-level validation shared by builds and pieces.
//!
//! Lengths are measured in characters, not bytes, so multi-byte names
//! (e.g. `禰豆子`) are held to the same limits as ASCII ones.

use validator::ValidateUrl;

use crate::error::CoreError;

/// Maximum length of a record name.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length of a record description.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Validate a required name: non-blank and at most [`MAX_NAME_LEN`] chars.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::validation("name", "must not be empty"));
    }
    validate_max_len("name", name, MAX_NAME_LEN)
}

/// Validate that a text field does not exceed `max` characters.
pub fn validate_max_len(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.chars().count() > max {
        return Err(CoreError::validation(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(())
}

/// Same as [`validate_max_len`] but skips unset values.
pub fn validate_opt_max_len(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<(), CoreError> {
    match value {
        Some(v) => validate_max_len(field, v, max),
        None => Ok(()),
    }
}

/// Validate a monetary amount: finite and not negative.
pub fn validate_amount(field: &str, value: Option<f64>) -> Result<(), CoreError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(CoreError::validation(field, "must be a non-negative number"))
        }
        _ => Ok(()),
    }
}

/// Validate an optional URL field. Empty strings are allowed and mean "no link".
pub fn validate_url(field: &str, value: Option<&str>) -> Result<(), CoreError> {
    match value {
        Some(v) if !v.is_empty() && !v.validate_url() => {
            Err(CoreError::validation(field, "must be a valid URL"))
        }
        _ => Ok(()),
    }
}

/// Trim tags, drop blanks, and remove duplicates while keeping first-seen order.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("Nezuko").is_ok());
    }

    #[test]
    fn name_limit_counts_characters() {
        let at_limit = "禰".repeat(MAX_NAME_LEN);
        assert!(validate_name(&at_limit).is_ok());

        let over = "a".repeat(MAX_NAME_LEN + 1);
        let err = validate_name(&over).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn optional_length_skips_none() {
        assert!(validate_opt_max_len("notes", None, 5).is_ok());
        assert!(validate_opt_max_len("notes", Some("123456"), 5).is_err());
    }

    #[test]
    fn negative_amount_is_rejected() {
        assert!(validate_amount("budget", Some(-0.01)).is_err());
        assert!(validate_amount("budget", Some(0.0)).is_ok());
        assert!(validate_amount("budget", None).is_ok());
    }

    #[test]
    fn tags_are_trimmed_and_deduplicated() {
        let tags = vec![
            " wig ".to_string(),
            "foam".to_string(),
            "".to_string(),
            "wig".to_string(),
        ];
        assert_eq!(normalize_tags(tags), vec!["wig", "foam"]);
    }

    #[test]
    fn url_must_be_absolute() {
        assert!(validate_url("image_url", Some("https://example.com/wig.png")).is_ok());
        assert!(validate_url("image_url", Some("")).is_ok());
        assert!(validate_url("image_url", Some("not a url")).is_err());
    }
}
