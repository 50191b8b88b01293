//! Domain rules for the KyaraFit cosplay tracker.
//!
//! This crate has zero internal dependencies so it can be used by both the
//! repository layer and the HTTP layer without pulling in either.

pub mod build;
pub mod dates;
pub mod error;
pub mod fields;
pub mod ownership;
pub mod patch;
pub mod piece;
pub mod search;
pub mod types;
