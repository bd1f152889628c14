//! Error type shared by the services

use super::validation::ValidationErrors;

/// Error types for service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A referenced row does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Input failed field validation
    #[error("Validation error: {0}")]
    ValidationError(ValidationErrors),

    /// The operation would violate a uniqueness rule
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: i64) -> Self {
        Self::NotFound(format!("{} with ID {} not found", entity, id))
    }

    /// Validation failure on a single field
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        Self::ValidationError(errors)
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        Self::ValidationError(errors)
    }
}
