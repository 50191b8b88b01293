//! Build entity model, request DTOs, and create/update reconciliation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use kyarafit_core::build::{
    self as rules, MAX_CHARACTER_LEN, MAX_NOTES_LEN, MAX_SERIES_LEN,
};
use kyarafit_core::dates::parse_optional_date;
use kyarafit_core::error::CoreError;
use kyarafit_core::fields::{
    normalize_tags, validate_amount, validate_name, validate_opt_max_len, MAX_DESCRIPTION_LEN,
};
use kyarafit_core::patch::{self, double_option, set_value};
use kyarafit_core::search::non_blank;
use kyarafit_core::types::{Date, RecordId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Progress of a build. Stored as the `build_status` PostgreSQL enum.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    sqlx::Type,
)]
#[sqlx(type_name = "build_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BuildStatus {
    #[default]
    Idea,
    Sourcing,
    Wip,
    Complete,
    OnHold,
    Cancelled,
}

impl BuildStatus {
    pub const ALL: [BuildStatus; 6] = [
        BuildStatus::Idea,
        BuildStatus::Sourcing,
        BuildStatus::Wip,
        BuildStatus::Complete,
        BuildStatus::OnHold,
        BuildStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BuildStatus::Idea => rules::STATUS_IDEA,
            BuildStatus::Sourcing => rules::STATUS_SOURCING,
            BuildStatus::Wip => rules::STATUS_WIP,
            BuildStatus::Complete => rules::STATUS_COMPLETE,
            BuildStatus::OnHold => rules::STATUS_ON_HOLD,
            BuildStatus::Cancelled => rules::STATUS_CANCELLED,
        }
    }

    /// Human-readable label for UI display.
    pub fn display_name(self) -> &'static str {
        match self {
            BuildStatus::Idea => "Idea",
            BuildStatus::Sourcing => "Sourcing",
            BuildStatus::Wip => "Work in Progress",
            BuildStatus::Complete => "Complete",
            BuildStatus::OnHold => "On Hold",
            BuildStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        rules::validate_status(s)?;
        BuildStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Internal(format!("status '{s}' has no variant")))
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A build row from the `builds` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Build {
    pub id: RecordId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub character: Option<String>,
    pub series: Option<String>,
    pub status: BuildStatus,
    /// 1-5 scale.
    pub priority: Option<i16>,
    pub budget: Option<f64>,
    pub spent: Option<f64>,
    pub start_date: Option<Date>,
    pub target_date: Option<Date>,
    pub completed_date: Option<Date>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// Payload for `POST /builds`.
///
/// Any `user_id` in the body is ignored; ownership always comes from the
/// authenticated caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBuildRequest {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub character: Option<String>,
    pub series: Option<String>,
    /// Defaults to `idea` when omitted.
    pub status: Option<String>,
    pub priority: Option<i64>,
    pub budget: Option<f64>,
    pub spent: Option<f64>,
    pub start_date: Option<String>,
    pub target_date: Option<String>,
    pub completed_date: Option<String>,
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
}

impl CreateBuildRequest {
    /// Validate the payload and produce a new record owned by `user_id`.
    ///
    /// Assigns a fresh id and sets both timestamps to `now`.
    pub fn into_build(self, user_id: &str, now: Timestamp) -> Result<Build, CoreError> {
        validate_name(&self.name)?;
        validate_text_fields(
            self.description.as_deref(),
            self.character.as_deref(),
            self.series.as_deref(),
            self.notes.as_deref(),
        )?;
        let priority = rules::validate_priority(self.priority)?;
        validate_amount("budget", self.budget)?;
        validate_amount("spent", self.spent)?;

        let status = match self.status.as_deref() {
            Some(s) => s.parse()?,
            None => BuildStatus::default(),
        };

        Ok(Build {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name: self.name,
            description: self.description,
            character: self.character,
            series: self.series,
            status,
            priority,
            budget: self.budget,
            spent: self.spent,
            start_date: parse_optional_date("start_date", self.start_date.as_deref())?,
            target_date: parse_optional_date("target_date", self.target_date.as_deref())?,
            completed_date: parse_optional_date("completed_date", self.completed_date.as_deref())?,
            tags: normalize_tags(self.tags.unwrap_or_default()),
            notes: self.notes,
            created_at: now,
            updated_at: now,
        })
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// Payload for `PUT /builds/{id}`. Every field is independently optional.
///
/// Clearable fields use `Option<Option<T>>`: an absent key leaves the stored
/// value alone, `null` clears it. Date fields are also cleared by `""`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBuildRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub character: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub series: Option<Option<String>>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub priority: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub budget: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub spent: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub start_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub target_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub completed_date: Option<Option<String>>,
    /// Replaces the whole tag list when present.
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

impl UpdateBuildRequest {
    /// Merge this payload into `existing`, returning the updated record.
    ///
    /// Nothing is applied unless every present field is valid. `updated_at`
    /// is set to `now` even when no field changed.
    pub fn apply_to(self, mut existing: Build, now: Timestamp) -> Result<Build, CoreError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        validate_text_fields(
            set_value(&self.description).map(String::as_str),
            set_value(&self.character).map(String::as_str),
            set_value(&self.series).map(String::as_str),
            set_value(&self.notes).map(String::as_str),
        )?;
        let priority = rules::validate_priority(set_value(&self.priority).copied())?;
        validate_amount("budget", set_value(&self.budget).copied())?;
        validate_amount("spent", set_value(&self.spent).copied())?;
        let status = self
            .status
            .as_deref()
            .map(str::parse::<BuildStatus>)
            .transpose()?;

        // Dates are parsed into a scratch copy so a bad date leaves nothing half-applied.
        let mut start_date = existing.start_date;
        let mut target_date = existing.target_date;
        let mut completed_date = existing.completed_date;
        patch::apply_date("start_date", self.start_date, &mut start_date)?;
        patch::apply_date("target_date", self.target_date, &mut target_date)?;
        patch::apply_date("completed_date", self.completed_date, &mut completed_date)?;

        if let Some(name) = self.name {
            existing.name = name;
        }
        if let Some(status) = status {
            existing.status = status;
        }
        if let Some(tags) = self.tags {
            existing.tags = normalize_tags(tags);
        }
        patch::apply(self.description, &mut existing.description);
        patch::apply(self.character, &mut existing.character);
        patch::apply(self.series, &mut existing.series);
        if self.priority.is_some() {
            existing.priority = priority;
        }
        patch::apply(self.budget, &mut existing.budget);
        patch::apply(self.spent, &mut existing.spent);
        patch::apply(self.notes, &mut existing.notes);
        existing.start_date = start_date;
        existing.target_date = target_date;
        existing.completed_date = completed_date;
        existing.updated_at = now;

        Ok(existing)
    }
}

fn validate_text_fields(
    description: Option<&str>,
    character: Option<&str>,
    series: Option<&str>,
    notes: Option<&str>,
) -> Result<(), CoreError> {
    validate_opt_max_len("description", description, MAX_DESCRIPTION_LEN)?;
    validate_opt_max_len("character", character, MAX_CHARACTER_LEN)?;
    validate_opt_max_len("series", series, MAX_SERIES_LEN)?;
    validate_opt_max_len("notes", notes, MAX_NOTES_LEN)
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Query parameters for `GET /builds`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub upcoming: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// The single narrowing applied to a build listing.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildFilter {
    All,
    Search(String),
    Status(BuildStatus),
    Priority(i16),
    /// Unfinished builds whose target date falls within this many days.
    Upcoming(i32),
}

impl BuildListParams {
    /// Pick the filter to apply. Filters are mutually exclusive and resolved
    /// in the order search, status, priority, upcoming.
    pub fn filter(&self) -> Result<BuildFilter, CoreError> {
        if let Some(term) = non_blank(self.search.as_deref()) {
            return Ok(BuildFilter::Search(term.to_string()));
        }
        if let Some(status) = non_blank(self.status.as_deref()) {
            return Ok(BuildFilter::Status(status.parse()?));
        }
        if let Some(priority) = non_blank(self.priority.as_deref()) {
            let priority = priority
                .parse::<i64>()
                .map_err(|_| CoreError::validation("priority", "must be between 1 and 5"))?;
            return Ok(BuildFilter::Priority(rules::priority_level(priority)?));
        }
        if let Some(days) = non_blank(self.upcoming.as_deref()) {
            let days = days.parse::<i64>().unwrap_or(0);
            return Ok(BuildFilter::Upcoming(rules::upcoming_days(days)));
        }
        Ok(BuildFilter::All)
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Response body for `GET /builds/stats`.
#[derive(Debug, Clone, Serialize)]
pub struct BuildStats {
    pub total_builds: i64,
    /// Every status is present, zero-filled.
    pub by_status: BTreeMap<BuildStatus, i64>,
    pub upcoming_builds: i64,
}

impl BuildStats {
    pub fn new(total_builds: i64, counts: Vec<(BuildStatus, i64)>, upcoming_builds: i64) -> Self {
        let mut by_status: BTreeMap<BuildStatus, i64> =
            BuildStatus::ALL.into_iter().map(|s| (s, 0)).collect();
        for (status, count) in counts {
            by_status.insert(status, count);
        }
        Self {
            total_builds,
            by_status,
            upcoming_builds,
        }
    }
}
