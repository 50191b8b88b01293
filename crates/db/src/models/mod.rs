//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO that reconciles into a new entity
//! - A `Deserialize` update DTO with presence-tracked fields that merges
//!   into an existing entity
//! - List query parameters and the filter they resolve to

pub mod build;
pub mod piece;
