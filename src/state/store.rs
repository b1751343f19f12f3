//! Query state store
//!
//! Holds the current query of one view. Every mutation replaces the query
//! wholesale; when the persisted subset changes it is written to the
//! preference store on a best-effort basis (failures are logged, never
//! returned). Preferences are read once, on open; anything missing or
//! malformed falls back to the view's defaults.

use std::sync::Arc;
use std::time::Duration;

use crate::executor::{Page, RecordQueryEngine};
use crate::observability::Logger;
use crate::query::{Query, QueryPatch, QueryResult};
use crate::record::Record;
use crate::view::ViewConfig;

use super::backend::PreferenceStore;
use super::debounce::{Clock, Debouncer, SystemClock, DEFAULT_SEARCH_DEBOUNCE};
use super::preferences::{Preferences, StoredPreferences};

type Listener = Box<dyn FnMut(&Query)>;

/// Current query of one view plus its persisted preferences
pub struct QueryStateStore {
    engine: RecordQueryEngine,
    prefs: Arc<dyn PreferenceStore>,
    clock: Arc<dyn Clock>,
    query: Query,
    pending_search: Debouncer<String>,
    listeners: Vec<Listener>,
}

impl QueryStateStore {
    /// Opens the store for a view.
    ///
    /// The base query is `initial` if given (e.g. a deep link), otherwise the
    /// view's default query. Stored preferences are then applied on top.
    pub fn open(view: ViewConfig, prefs: Arc<dyn PreferenceStore>, initial: Option<Query>) -> Self {
        let base = initial.unwrap_or_else(|| view.default_query());
        let query = match Self::load_preferences(&view, prefs.as_ref()) {
            Some(stored) => stored.apply_to(base),
            None => base,
        };

        Self {
            engine: RecordQueryEngine::new(view),
            prefs,
            clock: Arc::new(SystemClock),
            query,
            pending_search: Debouncer::new(DEFAULT_SEARCH_DEBOUNCE),
            listeners: Vec::new(),
        }
    }

    /// Uses the given clock for debouncing
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sets the search debounce delay
    pub fn with_search_debounce(mut self, delay: Duration) -> Self {
        self.pending_search = Debouncer::new(delay);
        self
    }

    /// Returns the current query
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Returns the view configuration
    pub fn view(&self) -> &ViewConfig {
        self.engine.view()
    }

    /// Returns the persisted subset of the current query
    pub fn preferences(&self) -> Preferences {
        Preferences::of(&self.query)
    }

    /// Registers a listener called with the new query after each change
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&Query) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Replaces the query. Cancels any pending debounced search.
    pub fn set_query(&mut self, query: Query) {
        self.pending_search.cancel();
        self.replace(query);
    }

    /// Shallow-merges a patch into the query.
    ///
    /// A patch carrying a search cancels any pending debounced search.
    pub fn patch_query(&mut self, patch: QueryPatch) {
        if patch.search.is_some() {
            self.pending_search.cancel();
        }
        let next = self.query.merged(&patch);
        self.replace(next);
    }

    /// Schedules a search change after the debounce delay.
    ///
    /// Each call restarts the delay; only the last text is applied, by
    /// [`tick`](Self::tick) once the delay has passed.
    pub fn set_search_debounced(&mut self, text: impl Into<String>) {
        let now = self.clock.now();
        self.pending_search.schedule(text.into(), now);

        let delay_ms = self.pending_search.delay().as_millis().to_string();
        Logger::trace(
            "SEARCH_DEBOUNCED",
            &[("view", self.view().name.as_str()), ("delay_ms", delay_ms.as_str())],
        );
    }

    /// Applies a due debounced search. Returns true if one was applied.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        match self.pending_search.poll(now) {
            Some(text) => {
                self.apply_search(text);
                true
            }
            None => false,
        }
    }

    /// Applies a pending debounced search immediately
    pub fn flush(&mut self) -> bool {
        match self.pending_search.flush() {
            Some(text) => {
                self.apply_search(text);
                true
            }
            None => false,
        }
    }

    /// Returns true if a debounced search is waiting
    pub fn has_pending_search(&self) -> bool {
        self.pending_search.is_pending()
    }

    /// Runs the current query over records
    pub fn execute<'a, R: Record>(&self, records: &'a [R]) -> QueryResult<Page<&'a R>> {
        self.engine.execute(records, &self.query)
    }

    fn apply_search(&mut self, text: String) {
        let patch = if text.trim().is_empty() {
            QueryPatch::new().clear_search()
        } else {
            QueryPatch::new().search(text)
        };
        let next = self.query.merged(&patch);
        self.replace(next);
    }

    fn replace(&mut self, next: Query) {
        if next == self.query {
            return;
        }

        let prefs_changed = Preferences::of(&next) != Preferences::of(&self.query);
        self.query = next;

        if prefs_changed {
            self.persist();
        }

        for listener in self.listeners.iter_mut() {
            listener(&self.query);
        }
    }

    // A subset the view would reject on load is kept in memory only, so the
    // last usable entry survives
    fn persist(&self) {
        let key = self.view().storage_key.as_str();
        let preferences = self.preferences();

        if !preferences.is_valid_for(self.view()) {
            Logger::warn("PREFS_WRITE_SKIPPED", &[("key", key), ("reason", "invalid for view")]);
            return;
        }

        let value = match serde_json::to_value(preferences) {
            Ok(value) => value,
            Err(e) => {
                let reason = e.to_string();
                Logger::warn("PREFS_WRITE_FAILED", &[("key", key), ("reason", reason.as_str())]);
                return;
            }
        };

        match self.prefs.set(key, &value) {
            Ok(()) => Logger::trace("PREFS_WRITTEN", &[("key", key)]),
            Err(e) => {
                let reason = e.to_string();
                Logger::warn("PREFS_WRITE_FAILED", &[("key", key), ("reason", reason.as_str())]);
            }
        }
    }

    // Absent, unreadable, malformed and invalid all mean "use defaults"
    fn load_preferences(view: &ViewConfig, prefs: &dyn PreferenceStore) -> Option<Preferences> {
        let key = view.storage_key.as_str();

        let value = match prefs.get(key) {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(e) => {
                let reason = e.to_string();
                Logger::warn("PREFS_LOAD_FALLBACK", &[("key", key), ("reason", reason.as_str())]);
                return None;
            }
        };

        let stored = serde_json::from_value::<StoredPreferences>(value)
            .map(|stored| stored.over(&view.defaults));

        match stored {
            Ok(stored) if stored.is_valid_for(view) => Some(stored),
            Ok(_) => {
                Logger::warn("PREFS_LOAD_FALLBACK", &[("key", key), ("reason", "invalid for view")]);
                None
            }
            Err(e) => {
                let reason = e.to_string();
                Logger::warn("PREFS_LOAD_FALLBACK", &[("key", key), ("reason", reason.as_str())]);
                None
            }
        }
    }
}
