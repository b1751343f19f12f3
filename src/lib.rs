//! callboard - filter, sort and page call-center records
//!
//! One record query engine serves every console view. A view supplies only
//! its field configuration; the engine runs search, per-field criteria,
//! sorting and pagination over an in-memory collection, and the query state
//! store remembers each view's display preferences between sessions.

pub mod cli;
pub mod executor;
pub mod observability;
pub mod query;
pub mod record;
pub mod state;
pub mod view;
