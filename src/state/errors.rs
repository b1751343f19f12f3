//! # Preference Storage Errors

use thiserror::Error;

/// Result type for preference storage operations
pub type PrefsResult<T> = Result<T, PrefsError>;

/// Preference storage errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrefsError {
    /// Backend read or write failed
    #[error("Preference I/O error: {0}")]
    Io(String),

    /// Stored value is not valid JSON
    #[error("Malformed preference data under '{0}': {1}")]
    Malformed(String, String),

    /// Key cannot be used by this backend
    #[error("Invalid preference key: {0}")]
    InvalidKey(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
