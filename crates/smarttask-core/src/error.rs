use thiserror::Error;

use crate::schema::SchemaViolation;

#[derive(Debug, Error)]
pub enum SmartTaskError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Outcome classes of a failed subtask generation.
///
/// The set is closed so callers can match every case. Only
/// `SchemaViolation` carries detail meant for the caller; the
/// `ProviderFailure` string is for logs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    #[error("task title is required")]
    MissingTitle,

    #[error("subtask generation is not configured")]
    ProviderUnavailable,

    #[error("subtasks format invalid: {0}")]
    SchemaViolation(SchemaViolation),

    #[error("provider failure: {0}")]
    ProviderFailure(String),
}

impl GenerationError {
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::MissingTitle => "missing_title",
            GenerationError::ProviderUnavailable => "provider_unavailable",
            GenerationError::SchemaViolation(_) => "schema_violation",
            GenerationError::ProviderFailure(_) => "provider_failure",
        }
    }
}

impl From<SchemaViolation> for GenerationError {
    fn from(v: SchemaViolation) -> Self {
        GenerationError::SchemaViolation(v)
    }
}
