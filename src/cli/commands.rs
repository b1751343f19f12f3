//! CLI command implementations
//!
//! `query` opens a query state store for the chosen view, applies the
//! command-line arguments to it, runs the engine over the records file and
//! prints one page. With `--prefs-dir`, sort, page size and columns given on
//! the command line are remembered for the next run of the same view.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::observability::Logger;
use crate::query::{parse_filter, parse_sort, QueryPatch};
use crate::state::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, QueryStateStore};
use crate::view::{presets, ViewConfig};

use super::args::{Cli, Command, QueryArgs};
use super::errors::{CliError, CliResult};
use super::io::{read_records, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    Logger::set_min_severity(cli.log_level);
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Query(args) => query(&args),
        Command::Views => views(),
    }
}

/// Run a query and print the page
pub fn query(args: &QueryArgs) -> CliResult<()> {
    let data = execute_query(args)?;
    write_response(data)
}

/// List built-in views
pub fn views() -> CliResult<()> {
    write_response(describe_views())
}

/// Run a query and return the response payload
pub fn execute_query(args: &QueryArgs) -> CliResult<Value> {
    let view = resolve_view(args)?;
    let records = read_records(&args.records)?;

    let mut initial = view.default_query();
    if let Some(search) = &args.search {
        initial = initial.with_search(search.clone());
    }
    for filter in &args.filters {
        let (field, criterion) = parse_filter(filter)?;
        initial = initial.with_filter(field, criterion);
    }

    let prefs: Arc<dyn PreferenceStore> = match &args.prefs_dir {
        Some(dir) => Arc::new(FilePreferenceStore::new(dir.clone())),
        None => Arc::new(MemoryPreferenceStore::new()),
    };

    let mut store = QueryStateStore::open(view, prefs, Some(initial));

    let mut patch = QueryPatch::new().page(args.page.unwrap_or(0));
    if let Some(sort) = &args.sort {
        patch = patch.sort(parse_sort(sort)?);
    }
    if let Some(page_size) = args.page_size {
        patch = patch.page_size(page_size);
    }
    if let Some(columns) = &args.columns {
        patch = patch.columns(columns.iter().map(|c| c.trim()).filter(|c| !c.is_empty()));
    }
    store.patch_query(patch);

    let page = store.execute(&records)?;
    let columns = store.query().columns.clone();
    let page = page.map(|row| project(row, &columns));

    let mut data = serde_json::to_value(&page)?;
    if let Value::Object(map) = &mut data {
        map.insert("view".to_string(), Value::String(store.view().name.clone()));
    }

    let view_name = store.view().name.as_str();
    let total = page.total.to_string();
    Logger::info("QUERY_COMPLETE", &[("view", view_name), ("total", total.as_str())]);

    Ok(data)
}

/// Describe the built-in views
pub fn describe_views() -> Value {
    let views: Vec<Value> = presets::all()
        .iter()
        .map(|view| {
            let fields: Map<String, Value> = view
                .fields
                .iter()
                .map(|(name, spec)| (name.clone(), Value::from(spec.kind.as_str())))
                .collect();
            json!({
                "name": view.name,
                "fields": fields,
                "storage_key": view.storage_key,
                "searchable": view.searchable_fields().map(|(name, _)| name).collect::<Vec<_>>(),
                "sortable": view.sortable_fields().collect::<Vec<_>>(),
                "defaults": view.defaults,
            })
        })
        .collect();

    Value::Array(views)
}

fn resolve_view(args: &QueryArgs) -> CliResult<ViewConfig> {
    match &args.view_config {
        Some(path) => Ok(ViewConfig::load(path)?),
        None => presets::by_name(&args.view).ok_or_else(|| CliError::unknown_view(&args.view)),
    }
}

// Keeps only the visible columns; all fields when none are set
fn project(row: &Value, columns: &[String]) -> Value {
    match row {
        Value::Object(fields) if !columns.is_empty() => {
            let projected: Map<String, Value> = columns
                .iter()
                .filter_map(|c| fields.get(c).map(|v| (c.clone(), v.clone())))
                .collect();
            Value::Object(projected)
        }
        other => other.clone(),
    }
}
