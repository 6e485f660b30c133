//! # Lookout Classifier
//!
//! Assigns every history record exactly one [`InvestigationType`].
//!
//! ```text
//! InvestigationRecord
//!     │
//!     ├──> recognised `type` tag on the payload? ──> that type
//!     │
//!     └──> heuristic rules over the query, first match wins
//!            email → phone → ipv4 → ipv6 → name → (username)
//! ```
//!
//! Classification is total and deterministic: it never fails and identical
//! input always yields the same type.

mod rules;

pub use lookout_protocol::InvestigationType;
pub use rules::{HeuristicRule, FALLBACK, HEURISTIC_RULES};

use lookout_protocol::InvestigationRecord;

/// Tag-first classifier with the heuristic table as fallback. Stateless.
pub struct InvestigationClassifier;

impl InvestigationClassifier {
    /// Classify a record: an explicit tag wins, otherwise the query heuristics.
    #[must_use]
    pub fn classify(record: &InvestigationRecord) -> InvestigationType {
        record
            .payload
            .tag()
            .unwrap_or_else(|| Self::classify_query(&record.query))
    }

    /// Classify a bare query with the heuristic rules alone.
    #[must_use]
    pub fn classify_query(query: &str) -> InvestigationType {
        match Self::matching_rule(query) {
            Some(rule) => {
                log::trace!("query '{query}' matched rule '{}'", rule.name);
                rule.kind
            }
            None => FALLBACK,
        }
    }

    /// First heuristic rule matching the query, if any.
    #[must_use]
    pub fn matching_rule(query: &str) -> Option<&'static HeuristicRule> {
        HEURISTIC_RULES.iter().find(|rule| rule.matches(query))
    }
}

/// Shorthand for [`InvestigationClassifier::classify`].
#[must_use]
pub fn classify(record: &InvestigationRecord) -> InvestigationType {
    InvestigationClassifier::classify(record)
}
