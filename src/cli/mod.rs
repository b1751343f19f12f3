//! CLI module for callboard
//!
//! Provides command-line interface for:
//! - query: Run one query over a records file and print the page
//! - views: List the built-in views

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, QueryArgs};
pub use commands::{describe_views, execute_query, query, run, run_command, views};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_records, write_error, write_response};
