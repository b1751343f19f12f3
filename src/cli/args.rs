//! CLI argument definitions using clap
//!
//! Commands:
//! - callboard query --records <path> [--view <name>] [query options]
//! - callboard views

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::observability::Severity;

/// callboard - filter, sort and page call-center records
#[derive(Parser, Debug)]
#[command(name = "callboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Lowest log severity written to stderr (trace, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: Severity,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a query over a JSON array of records and print one page
    Query(QueryArgs),

    /// List the built-in views
    Views,
}

#[derive(Args, Debug, Clone, Default)]
pub struct QueryArgs {
    /// Path to a JSON file holding an array of records
    #[arg(long)]
    pub records: PathBuf,

    /// Built-in view name
    #[arg(long, default_value = "call-history")]
    pub view: String,

    /// Path to a JSON view configuration (overrides --view)
    #[arg(long)]
    pub view_config: Option<PathBuf>,

    /// Free-text search over the view's searchable fields
    #[arg(long)]
    pub search: Option<String>,

    /// Filter as field=op:value (ops: in, range, dates); repeatable
    #[arg(long = "filter")]
    pub filters: Vec<String>,

    /// Sort as field, field.asc or field.desc
    #[arg(long)]
    pub sort: Option<String>,

    /// Zero-based page index
    #[arg(long)]
    pub page: Option<usize>,

    /// Rows per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Comma-separated visible columns
    #[arg(long, value_delimiter = ',')]
    pub columns: Option<Vec<String>>,

    /// Directory for persisted view preferences
    #[arg(long)]
    pub prefs_dir: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
