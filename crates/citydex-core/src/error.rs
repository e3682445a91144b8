use thiserror::Error;

/// Errors raised by [`Repository`](crate::Repository) implementations.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage constraint violated: {0}")]
    Constraint(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Rejections produced when validating city input before it reaches storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("tourist rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
    #[error("invalid establishment date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },
    #[error("estimated population must not be negative, got {0}")]
    NegativePopulation(i64),
}
