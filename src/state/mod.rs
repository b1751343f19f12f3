//! Query state for one view
//!
//! The [`QueryStateStore`] owns the current query, persists its preference
//! subset through an injected [`PreferenceStore`], notifies listeners on
//! change, and debounces free-text search input.
//!
//! # Principles
//!
//! 1. A query is replaced wholesale on every mutation
//! 2. Only display preferences are persisted
//! 3. Storage failures are logged and swallowed, never surfaced
//! 4. Missing and malformed stored data are treated the same: use defaults

mod backend;
mod debounce;
mod errors;
mod file;
mod memory;
mod preferences;
mod store;

pub use backend::PreferenceStore;
pub use debounce::{Clock, Debouncer, ManualClock, SystemClock, DEFAULT_SEARCH_DEBOUNCE};
pub use errors::{PrefsError, PrefsResult};
pub use file::FilePreferenceStore;
pub use memory::MemoryPreferenceStore;
pub use preferences::{Preferences, StoredPreferences};
pub use store::QueryStateStore;
