//! Observability for callboard
//!
//! Structured JSON-line logging with explicit severities. Logging is
//! read-only: it never changes query results and never returns errors.
//!
//! ```ignore
//! use callboard::observability::{Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Warn);
//! Logger::warn("PREFS_WRITE_FAILED", &[("key", "callHistory.prefs.v1")]);
//! ```

mod logger;

pub use logger::{Logger, Severity};
