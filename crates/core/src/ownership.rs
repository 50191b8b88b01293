//! Ownership checks for single-record endpoints.
//!
//! Reads report a foreign record as [`CoreError::Forbidden`] so the caller
//! gets precise feedback. Mutations report it as [`CoreError::NotFound`],
//! indistinguishable from a record that does not exist, so update and
//! delete endpoints cannot be used to probe for other users' ids.

use crate::error::CoreError;
use crate::types::RecordId;

/// What the caller is trying to do with the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Mutate,
}

/// Check that `caller` owns the record.
pub fn ensure_owner(
    entity: &'static str,
    id: RecordId,
    owner: &str,
    caller: &str,
    access: Access,
) -> Result<(), CoreError> {
    if owner == caller {
        return Ok(());
    }
    match access {
        Access::Read => Err(CoreError::Forbidden("Access denied".into())),
        Access::Mutate => Err(CoreError::NotFound { entity, id }),
    }
}
