//! Query State Persistence Tests
//!
//! Tests for preference persistence and search debouncing:
//! - Display preferences survive reopening a view
//! - Transient state (search, filters, page) is never stored
//! - Corrupt or foreign stored data falls back to defaults
//! - Debounced search applies only the last input, once

use std::cell::RefCell;
use std::fs;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use callboard::query::{Criterion, Query, QueryPatch, SortSpec};
use callboard::state::{
    FilePreferenceStore, ManualClock, PreferenceStore, Preferences, QueryStateStore,
    DEFAULT_SEARCH_DEBOUNCE,
};
use callboard::view::presets;
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const KEY: &str = "callHistory.prefs.v1";

fn file_store(tmp: &TempDir) -> Arc<FilePreferenceStore> {
    Arc::new(FilePreferenceStore::new(tmp.path().join("prefs")))
}

fn open(backend: Arc<FilePreferenceStore>) -> QueryStateStore {
    QueryStateStore::open(presets::call_history(), backend, None)
}

// =============================================================================
// Round Trip Tests
// =============================================================================

/// Preferences written by one session are read by the next.
#[test]
fn test_preferences_survive_reopen() {
    let tmp = TempDir::new().unwrap();

    let mut store = open(file_store(&tmp));
    store.patch_query(
        QueryPatch::new()
            .sort(SortSpec::asc("agentName"))
            .page_size(25)
            .columns(["agentName", "status"]),
    );
    drop(store);

    let store = open(file_store(&tmp));
    assert_eq!(store.query().sort, Some(SortSpec::asc("agentName")));
    assert_eq!(store.query().page_size, 25);
    assert_eq!(store.query().columns, vec!["agentName", "status"]);
}

/// Search, filters and page index stay out of storage.
#[test]
fn test_transient_state_not_persisted() {
    let tmp = TempDir::new().unwrap();
    let backend = file_store(&tmp);

    let mut store = open(backend.clone());
    store.patch_query(QueryPatch::new().page_size(20));
    store.patch_query(QueryPatch::new().search("555").page(3));
    let filtered = store
        .query()
        .clone()
        .with_filter("status", Criterion::one_of(["missed"]));
    store.set_query(filtered);

    let stored = backend.get(KEY).unwrap().unwrap();
    let prefs: Preferences = serde_json::from_value(stored.clone()).unwrap();
    assert_eq!(prefs.page_size, 20);
    assert!(stored.get("search").is_none());
    assert!(stored.get("filters").is_none());
    assert!(stored.get("page").is_none());

    let reopened = open(backend);
    assert_eq!(reopened.query().search, None);
    assert!(reopened.query().filters.is_empty());
    assert_eq!(reopened.query().page, 0);
}

/// A deep link keeps its search while stored preferences still apply.
#[test]
fn test_deep_link_over_stored_preferences() {
    let tmp = TempDir::new().unwrap();
    let backend = file_store(&tmp);
    backend
        .set(KEY, &json!({"page_size": 50, "sort": {"field": "duration", "direction": "asc"}}))
        .unwrap();

    let store = QueryStateStore::open(
        presets::call_history(),
        backend,
        Some(presets::calls_for_number("555-0100")),
    );

    assert_eq!(store.query().active_search(), Some("555-0100"));
    assert_eq!(store.query().page_size, 50);
    assert_eq!(store.query().sort, Some(SortSpec::asc("duration")));
}

// =============================================================================
// Fallback Tests
// =============================================================================

/// Invalid JSON under the key falls back to the view's defaults.
#[test]
fn test_invalid_json_falls_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let backend = file_store(&tmp);
    let path = backend.path_for(KEY).unwrap();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "{\"page_size\": 25, \"sort\": ").unwrap();

    let store = open(backend);

    assert_eq!(store.query(), &presets::call_history().default_query());
}

/// Well-formed preferences that the view cannot use are ignored.
#[test]
fn test_foreign_preferences_fall_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let backend = file_store(&tmp);
    let defaults = presets::call_history().default_query();

    for stored in [
        json!({"page_size": 0}),
        json!({"sort": {"field": "recorded", "direction": "asc"}}),
        json!({"columns": ["salary"]}),
        json!({"page_size": "ten"}),
        json!(["startedAt"]),
    ] {
        backend.set(KEY, &stored).unwrap();
        let store = open(backend.clone());
        assert_eq!(store.query(), &defaults, "stored {}", stored);
    }
}

/// After a fallback the next preference change overwrites the bad entry.
#[test]
fn test_fallback_then_write_repairs_entry() {
    let tmp = TempDir::new().unwrap();
    let backend = file_store(&tmp);
    let path = backend.path_for(KEY).unwrap();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "not json").unwrap();

    let mut store = open(backend.clone());
    store.patch_query(QueryPatch::new().page_size(15));

    let prefs: Preferences = serde_json::from_value(backend.get(KEY).unwrap().unwrap()).unwrap();
    assert_eq!(prefs.page_size, 15);
}

/// A stored entry with only some keys keeps the view's other defaults.
#[test]
fn test_partial_entry_keeps_view_defaults() {
    let tmp = TempDir::new().unwrap();
    let backend = file_store(&tmp);
    backend.set(KEY, &json!({"page_size": 25})).unwrap();

    let store = open(backend);
    let defaults = presets::call_history().default_query();

    assert_eq!(store.query().page_size, 25);
    assert_eq!(store.query().sort, Some(SortSpec::desc("startedAt")));
    assert_eq!(store.query().columns, defaults.columns);
}

/// A change the view cannot use leaves the last usable entry in place.
#[test]
fn test_unusable_change_keeps_stored_entry() {
    let tmp = TempDir::new().unwrap();
    let backend = file_store(&tmp);
    let records = vec![json!({"direction": "inbound"})];

    let mut store = open(backend.clone());
    store.patch_query(QueryPatch::new().page_size(50));
    store.patch_query(QueryPatch::new().sort(SortSpec::asc("direction")));
    assert!(store.execute(&records).is_err());

    let stored = backend.get(KEY).unwrap().unwrap();
    assert_eq!(stored["sort"]["field"], "startedAt");

    let reopened = open(backend);
    assert_eq!(reopened.query().page_size, 50);
    assert_eq!(reopened.query().sort, Some(SortSpec::desc("startedAt")));
}

// =============================================================================
// Debounce Tests
// =============================================================================

/// Rapid input applies only the last text, once the delay has passed.
#[test]
fn test_debounced_search_coalesces_input() {
    let tmp = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::new());
    let changes = Rc::new(RefCell::new(Vec::new()));

    let mut store = open(file_store(&tmp)).with_clock(clock.clone());
    let seen = changes.clone();
    store.subscribe(move |query: &Query| seen.borrow_mut().push(query.search.clone()));

    for text in ["5", "55", "555"] {
        store.set_search_debounced(text);
        clock.advance(Duration::from_millis(100));
        assert!(!store.tick());
    }

    clock.advance(DEFAULT_SEARCH_DEBOUNCE);
    assert!(store.tick());
    assert!(!store.tick());

    assert_eq!(store.query().active_search(), Some("555"));
    assert_eq!(*changes.borrow(), vec![Some("555".to_string())]);
}

/// Debouncing alone never writes preferences.
#[test]
fn test_debounced_search_does_not_persist() {
    let tmp = TempDir::new().unwrap();
    let backend = file_store(&tmp);
    let clock = Arc::new(ManualClock::new());

    let mut store = open(backend.clone()).with_clock(clock.clone());
    store.set_search_debounced("dana");
    clock.advance(DEFAULT_SEARCH_DEBOUNCE);
    assert!(store.tick());

    assert!(backend.get(KEY).unwrap().is_none());
}

/// An explicit query replacement drops a pending search.
#[test]
fn test_set_query_cancels_pending_search() {
    let tmp = TempDir::new().unwrap();
    let clock = Arc::new(ManualClock::new());

    let mut store = open(file_store(&tmp)).with_clock(clock.clone());
    store.set_search_debounced("555");
    store.set_query(presets::call_history().default_query());

    clock.advance(DEFAULT_SEARCH_DEBOUNCE * 2);
    assert!(!store.has_pending_search());
    assert!(!store.tick());
    assert_eq!(store.query().search, None);
}
