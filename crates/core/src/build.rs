//! Build (cosplay project) constants and validation rules.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_IDEA: &str = "idea";
pub const STATUS_SOURCING: &str = "sourcing";
pub const STATUS_WIP: &str = "wip";
pub const STATUS_COMPLETE: &str = "complete";
pub const STATUS_ON_HOLD: &str = "on_hold";
pub const STATUS_CANCELLED: &str = "cancelled";

/// All valid build statuses. Any status may follow any other.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_IDEA,
    STATUS_SOURCING,
    STATUS_WIP,
    STATUS_COMPLETE,
    STATUS_ON_HOLD,
    STATUS_CANCELLED,
];

/// Statuses excluded from the upcoming-deadline window.
pub const FINISHED_STATUSES: &[&str] = &[STATUS_COMPLETE, STATUS_CANCELLED];

// ---------------------------------------------------------------------------
// Field limits
// ---------------------------------------------------------------------------

pub const MAX_CHARACTER_LEN: usize = 255;
pub const MAX_SERIES_LEN: usize = 255;
pub const MAX_NOTES_LEN: usize = 2000;

pub const MIN_PRIORITY: i16 = 1;
pub const MAX_PRIORITY: i16 = 5;

/// Window used by `?upcoming=` when no positive day count is given, and by
/// the stats endpoint.
pub const DEFAULT_UPCOMING_DAYS: i32 = 30;

/// Longest `?upcoming=` window honoured. Larger requests are capped so the
/// date arithmetic stays inside PostgreSQL's date range.
pub const MAX_UPCOMING_DAYS: i32 = 36_500;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a status string against [`VALID_STATUSES`].
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if !VALID_STATUSES.contains(&status) {
        return Err(CoreError::validation(
            "status",
            format!(
                "invalid status '{status}', must be one of: {}",
                VALID_STATUSES.join(", ")
            ),
        ));
    }
    Ok(())
}

/// Check a requested priority against the 1-5 scale.
///
/// Takes the wide integer the client sent so values outside `i16` still get
/// a `priority:` validation error.
pub fn priority_level(priority: i64) -> Result<i16, CoreError> {
    i16::try_from(priority)
        .ok()
        .filter(|p| (MIN_PRIORITY..=MAX_PRIORITY).contains(p))
        .ok_or_else(|| {
            CoreError::validation(
                "priority",
                format!("must be between {MIN_PRIORITY} and {MAX_PRIORITY}"),
            )
        })
}

/// Validate an optional priority, narrowing it to the stored width.
pub fn validate_priority(priority: Option<i64>) -> Result<Option<i16>, CoreError> {
    priority.map(priority_level).transpose()
}

/// Resolve the `?upcoming=` day count. Non-positive values fall back to
/// [`DEFAULT_UPCOMING_DAYS`]; values above [`MAX_UPCOMING_DAYS`] are capped.
pub fn upcoming_days(requested: i64) -> i32 {
    if requested <= 0 {
        return DEFAULT_UPCOMING_DAYS;
    }
    i32::try_from(requested)
        .unwrap_or(MAX_UPCOMING_DAYS)
        .min(MAX_UPCOMING_DAYS)
}
