use std::fmt;

/// Service-level errors
#[derive(Debug)]
pub enum ServiceError {
    /// The underlying store rejected a statement or could not be reached
    Storage(sqlx::Error),

    /// Malformed input or a data-integrity violation
    Validation(String),

    /// No stored job matches the given id
    NotFound(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Storage(e) => write!(f, "Storage error: {}", e),
            ServiceError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ServiceError::NotFound(id) => write!(f, "Job not found: {}", id),
        }
    }
}

impl std::error::Error for ServiceError {}
