//! Built-in views of the console
//!
//! Field names follow the records the console renders: call detail records,
//! agent performance rows, user accounts and queue rows.

use super::config::{FieldSpec, ViewConfig};
use crate::query::{Query, SortSpec};
use crate::state::Preferences;

pub const CALL_HISTORY: &str = "call-history";
pub const AGENT_PERFORMANCE: &str = "agent-performance";
pub const USERS: &str = "users";
pub const QUEUES: &str = "queues";

/// Call detail records
pub fn call_history() -> ViewConfig {
    ViewConfig::new(CALL_HISTORY, "callHistory.prefs.v1")
        .with_field("id", FieldSpec::text().searchable())
        .with_field("callerNumber", FieldSpec::phone().searchable().sortable())
        .with_field("calledNumber", FieldSpec::phone().searchable().sortable())
        .with_field("agentName", FieldSpec::text().searchable().sortable())
        .with_field("queue", FieldSpec::text().sortable())
        .with_field("direction", FieldSpec::text())
        .with_field("status", FieldSpec::text().sortable())
        .with_field("startedAt", FieldSpec::timestamp().sortable())
        .with_field("duration", FieldSpec::number().sortable())
        .with_field("waitTime", FieldSpec::number().sortable())
        .with_field("recorded", FieldSpec::boolean())
        .with_defaults(Preferences {
            columns: columns(&[
                "startedAt",
                "direction",
                "callerNumber",
                "calledNumber",
                "agentName",
                "queue",
                "duration",
                "status",
            ]),
            page_size: 10,
            sort: Some(SortSpec::desc("startedAt")),
        })
}

/// Agent performance rows
pub fn agent_performance() -> ViewConfig {
    ViewConfig::new(AGENT_PERFORMANCE, "agentPerformance.prefs.v1")
        .with_field("agentName", FieldSpec::text().searchable().sortable())
        .with_field("extension", FieldSpec::phone().searchable())
        .with_field("team", FieldSpec::text().searchable().sortable())
        .with_field("status", FieldSpec::text().sortable())
        .with_field("callsHandled", FieldSpec::number().sortable())
        .with_field("avgHandleTime", FieldSpec::number().sortable())
        .with_field("satisfaction", FieldSpec::number().sortable())
        .with_field("lastCallAt", FieldSpec::timestamp().sortable())
        .with_defaults(Preferences {
            columns: columns(&[
                "agentName",
                "team",
                "status",
                "callsHandled",
                "avgHandleTime",
                "satisfaction",
            ]),
            page_size: 20,
            sort: Some(SortSpec::desc("callsHandled")),
        })
}

/// User accounts
pub fn users() -> ViewConfig {
    ViewConfig::new(USERS, "users.prefs.v1")
        .with_field("name", FieldSpec::text().searchable().sortable())
        .with_field("email", FieldSpec::text().searchable().sortable())
        .with_field("extension", FieldSpec::phone().searchable().sortable())
        .with_field("role", FieldSpec::text().sortable())
        .with_field("status", FieldSpec::text().sortable())
        .with_field("lastLogin", FieldSpec::timestamp().sortable())
        .with_field("active", FieldSpec::boolean())
        .with_defaults(Preferences {
            columns: columns(&["name", "email", "extension", "role", "status", "lastLogin"]),
            page_size: 10,
            sort: Some(SortSpec::asc("name")),
        })
}

/// Queue and trunk rows
pub fn queues() -> ViewConfig {
    ViewConfig::new(QUEUES, "queues.prefs.v1")
        .with_field("name", FieldSpec::text().searchable().sortable())
        .with_field("strategy", FieldSpec::text().sortable())
        .with_field("trunk", FieldSpec::text().searchable())
        .with_field("agents", FieldSpec::number().sortable())
        .with_field("waiting", FieldSpec::number().sortable())
        .with_field("maxWait", FieldSpec::number().sortable())
        .with_field("serviceLevel", FieldSpec::number().sortable())
        .with_field("enabled", FieldSpec::boolean())
        .with_defaults(Preferences {
            columns: columns(&["name", "strategy", "agents", "waiting", "maxWait", "serviceLevel"]),
            page_size: 10,
            sort: Some(SortSpec::asc("name")),
        })
}

/// All built-in views
pub fn all() -> Vec<ViewConfig> {
    vec![call_history(), agent_performance(), users(), queues()]
}

/// Looks up a built-in view by name
pub fn by_name(name: &str) -> Option<ViewConfig> {
    all().into_iter().find(|view| view.name == name)
}

/// Initial call-history query for a "filter by number" link.
///
/// The number is matched against both caller and called number.
pub fn calls_for_number(number: &str) -> Query {
    call_history().default_query().with_search(number)
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for view in all() {
            assert!(view.validate().is_ok(), "view {} invalid", view.name);
            assert!(view.storage_key.ends_with(".v1"));
            assert!(view.default_query().validate(&view).is_ok());
        }
    }

    #[test]
    fn test_by_name() {
        assert_eq!(by_name(CALL_HISTORY).unwrap().storage_key, "callHistory.prefs.v1");
        assert!(by_name("chat").is_none());
    }

    #[test]
    fn test_calls_for_number() {
        let query = calls_for_number("+1 555 0100");
        assert_eq!(query.active_search(), Some("+1 555 0100"));
        assert_eq!(query.sort, Some(SortSpec::desc("startedAt")));
    }
}
