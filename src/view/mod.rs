//! Per-view configuration of the record query engine
//!
//! Each console view supplies only its field configuration; filtering,
//! sorting and paging are shared.

mod config;
pub mod presets;

pub use config::{ConfigError, ConfigResult, FieldKind, FieldSpec, ViewConfig};
