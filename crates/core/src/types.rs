/// Record primary keys are UUIDs generated when the record is reconciled.
pub type RecordId = uuid::Uuid;

/// Opaque caller identifier taken from the token subject.
pub type UserId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates carry no time component.
pub type Date = chrono::NaiveDate;
