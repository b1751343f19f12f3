//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero status.

use std::fmt;
use std::io;

use crate::query::QueryError;
use crate::view::ConfigError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// View configuration error
    ConfigError,
    /// I/O error (files, stdout)
    IoError,
    /// Records file is not a JSON array
    InvalidRecords,
    /// Query arguments rejected
    InvalidQuery,
    /// No built-in view with that name
    UnknownView,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "CALLBOARD_CLI_CONFIG_ERROR",
            Self::IoError => "CALLBOARD_CLI_IO_ERROR",
            Self::InvalidRecords => "CALLBOARD_CLI_INVALID_RECORDS",
            Self::InvalidQuery => "CALLBOARD_CLI_INVALID_QUERY",
            Self::UnknownView => "CALLBOARD_CLI_UNKNOWN_VIEW",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Records file malformed
    pub fn invalid_records(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidRecords, msg)
    }

    /// Unknown built-in view
    pub fn unknown_view(name: &str) -> Self {
        Self::new(
            CliErrorCode::UnknownView,
            format!("Unknown view '{}'. Run 'callboard views' to list views.", name),
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        Self::new(CliErrorCode::InvalidQuery, format!("{} ({})", e, e.code()))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
