use crate::types::RecordId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: RecordId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Build a validation error that names the offending field.
    pub fn validation(field: &str, reason: impl std::fmt::Display) -> Self {
        CoreError::Validation(format!("{field}: {reason}"))
    }
}
