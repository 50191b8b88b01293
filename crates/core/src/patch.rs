//! Presence tracking for partial updates.
//!
//! Update DTOs model clearable fields as `Option<Option<T>>`:
//!
//! | JSON            | Value              | Effect            |
//! |-----------------|--------------------|-------------------|
//! | key absent      | `None`             | leave untouched   |
//! | `"key": null`   | `Some(None)`       | clear the field   |
//! | `"key": value`  | `Some(Some(v))`    | overwrite         |
//!
//! Serde collapses `null` into the outer `None` by default, so such fields
//! must be annotated with
//! `#[serde(default, deserialize_with = "kyarafit_core::patch::double_option")]`.

use serde::{Deserialize, Deserializer};

use crate::dates::parse_date;
use crate::error::CoreError;
use crate::types::Date;

/// Deserialize a present key (including `null`) into `Some(_)`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Apply a clearable patch value to a stored field.
pub fn apply<T>(patch: Option<Option<T>>, target: &mut Option<T>) {
    if let Some(value) = patch {
        *target = value;
    }
}

/// Apply a date patch. `null` and `""` clear the field; any other string
/// must parse as `YYYY-MM-DD`.
pub fn apply_date(
    field: &str,
    patch: Option<Option<String>>,
    target: &mut Option<Date>,
) -> Result<(), CoreError> {
    match patch {
        None => {}
        Some(None) => *target = None,
        Some(Some(s)) if s.is_empty() => *target = None,
        Some(Some(s)) => *target = Some(parse_date(field, &s)?),
    }
    Ok(())
}

/// Borrow the inner value of a patch for validation, if one is being set.
pub fn set_value<T>(patch: &Option<Option<T>>) -> Option<&T> {
    patch.as_ref().and_then(Option::as_ref)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "double_option")]
        notes: Option<Option<String>>,
    }

    #[test]
    fn distinguishes_absent_null_and_value() {
        let absent: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.notes, None);

        let null: Probe = serde_json::from_str(r#"{"notes": null}"#).unwrap();
        assert_eq!(null.notes, Some(None));

        let set: Probe = serde_json::from_str(r#"{"notes": "glue the wig cap"}"#).unwrap();
        assert_eq!(set.notes, Some(Some("glue the wig cap".to_string())));
    }

    #[test]
    fn apply_leaves_field_when_absent() {
        let mut stored = Some(3);
        apply(None, &mut stored);
        assert_eq!(stored, Some(3));
        apply(Some(None), &mut stored);
        assert_eq!(stored, None);
        apply(Some(Some(5)), &mut stored);
        assert_eq!(stored, Some(5));
    }

    #[test]
    fn empty_date_string_clears() {
        let mut stored = Date::from_ymd_opt(2025, 10, 1);
        apply_date("target_date", Some(Some(String::new())), &mut stored).unwrap();
        assert_eq!(stored, None);
    }

    #[test]
    fn bad_date_leaves_field_and_errors() {
        let original = Date::from_ymd_opt(2025, 10, 1);
        let mut stored = original;
        let err = apply_date("start_date", Some(Some("tomorrow".into())), &mut stored);
        assert!(err.is_err());
        assert_eq!(stored, original);
    }
}
