use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::InvestigationType;

pub const UNAVAILABLE_MESSAGE: &str = "Failed to load history";
pub const EMPTY_MESSAGE: &str = "No recent searches.";

/// Summary counters shown above the history list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HistoryStats {
    pub total: usize,
    pub found: usize,
    /// Record count per classified type, keyed by wire name.
    #[serde(default)]
    pub by_type: BTreeMap<String, usize>,
}

/// One row of the rendered history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HistoryRow {
    pub query: String,
    #[serde(rename = "type")]
    pub kind: InvestigationType,
    pub label: String,
    pub icon: String,
    /// RFC 3339, absent when the backend supplied none.
    pub timestamp: Option<String>,
    /// This record's contribution to the found counter.
    pub found: usize,
    /// Error reported by the lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Profile URLs on the platforms where the handle exists.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
}

/// Everything the renderer needs to draw the history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HistoryView {
    /// Retrieval failed; render an error instead of the empty state.
    Unavailable { message: String },
    /// The history is legitimately empty.
    Empty { message: String },
    /// The active filter excluded every record.
    NoMatches { filter: String, message: String },
    Rows {
        filter: String,
        sort: String,
        /// Matches before row truncation.
        total_matches: usize,
        rows: Vec<HistoryRow>,
    },
}

impl HistoryView {
    #[must_use]
    pub fn unavailable() -> Self {
        HistoryView::Unavailable {
            message: UNAVAILABLE_MESSAGE.to_string(),
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        HistoryView::Empty {
            message: EMPTY_MESSAGE.to_string(),
        }
    }

    #[must_use]
    pub fn no_matches(filter: &str) -> Self {
        HistoryView::NoMatches {
            filter: filter.to_string(),
            message: format!("No {filter} searches found."),
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[HistoryRow] {
        match self {
            HistoryView::Rows { rows, .. } => rows,
            _ => &[],
        }
    }

    /// Message to show instead of rows, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            HistoryView::Unavailable { message }
            | HistoryView::Empty { message }
            | HistoryView::NoMatches { message, .. } => Some(message),
            HistoryView::Rows { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn view_serialises_with_state_tag() {
        let value = serde_json::to_value(HistoryView::no_matches("email")).unwrap();
        assert_eq!(
            value,
            json!({
                "state": "no_matches",
                "filter": "email",
                "message": "No email searches found."
            })
        );
    }

    #[test]
    fn row_uses_type_field() {
        let row = HistoryRow {
            query: "bob".to_string(),
            kind: InvestigationType::Username,
            label: "Username".to_string(),
            icon: "fa-at".to_string(),
            timestamp: None,
            found: 2,
            error: None,
            links: Vec::new(),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["type"], "username");
        assert!(value.get("error").is_none());
        assert!(value.get("links").is_none());
    }
}
