//! Shared response envelope types for API handlers.
//!
//! Single records use `{ "data": ... }`; listings add paging metadata.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Paged listing envelope.
///
/// `total_count` is the caller's total number of records, independent of
/// any filter applied to `data`.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub data: Vec<T>,
    pub total_count: i64,
    pub limit: i64,
    pub offset: i64,
}
