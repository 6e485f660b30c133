use lookout_protocol::{
    HistoryRow, HistorySnapshot, HistoryStats, HistoryView, InvestigationRecord,
    InvestigationType,
};

use crate::config::HistoryConfig;
use crate::stats::{compute_stats, found_for};
use crate::view::{classified, filter_and_sort, HistoryFilter, SortKey};

/// Immutable presentation state: the full history plus the active filter and
/// sort. Every change produces a new value and views are always derived from
/// the full history, never from a previously filtered subset.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryState {
    snapshot: HistorySnapshot,
    filter: HistoryFilter,
    sort: SortKey,
    max_rows: Option<usize>,
}

impl HistoryState {
    #[must_use]
    pub fn new(snapshot: HistorySnapshot, config: &HistoryConfig) -> Self {
        Self {
            snapshot,
            filter: config.filter(),
            sort: config.sort(),
            max_rows: config.max_rows,
        }
    }

    #[must_use]
    pub fn with_filter(self, filter: HistoryFilter) -> Self {
        Self { filter, ..self }
    }

    #[must_use]
    pub fn with_sort(self, sort: SortKey) -> Self {
        Self { sort, ..self }
    }

    #[must_use]
    pub fn with_max_rows(self, max_rows: Option<usize>) -> Self {
        Self { max_rows, ..self }
    }

    /// Append a freshly completed investigation.
    #[must_use]
    pub fn with_record(self, record: InvestigationRecord) -> Self {
        Self {
            snapshot: self.snapshot.with_record(record),
            ..self
        }
    }

    #[must_use]
    pub const fn filter(&self) -> HistoryFilter {
        self.filter
    }

    #[must_use]
    pub const fn sort(&self) -> SortKey {
        self.sort
    }

    #[must_use]
    pub const fn snapshot(&self) -> &HistorySnapshot {
        &self.snapshot
    }

    /// Counters over the full history, independent of the active filter.
    #[must_use]
    pub fn stats(&self) -> HistoryStats {
        compute_stats(self.snapshot.records())
    }

    /// Records in display order under the active filter and sort.
    #[must_use]
    pub fn visible(&self) -> Vec<&InvestigationRecord> {
        filter_and_sort(self.snapshot.records(), self.filter, self.sort)
    }

    /// The payload handed to the renderer.
    #[must_use]
    pub fn view(&self) -> HistoryView {
        let records = match &self.snapshot {
            HistorySnapshot::Unavailable { reason } => {
                log::debug!("history unavailable: {reason}");
                return HistoryView::unavailable();
            }
            HistorySnapshot::Available(records) => records,
        };
        if records.is_empty() {
            return HistoryView::empty();
        }

        let matches = classified(records, self.filter, self.sort);
        if matches.is_empty() {
            return HistoryView::no_matches(self.filter.as_str());
        }

        let total_matches = matches.len();
        let rows = matches
            .into_iter()
            .take(self.max_rows.unwrap_or(usize::MAX))
            .map(|(kind, record)| history_row(kind, record))
            .collect();

        HistoryView::Rows {
            filter: self.filter.as_str().to_string(),
            sort: self.sort.as_str().to_string(),
            total_matches,
            rows,
        }
    }
}

fn history_row(kind: InvestigationType, record: &InvestigationRecord) -> HistoryRow {
    HistoryRow {
        query: record.query.clone(),
        kind,
        label: kind.label().to_string(),
        icon: kind.icon().to_string(),
        timestamp: record.timestamp.map(|ts| ts.to_rfc3339()),
        found: found_for(kind, record),
        error: record.payload.error().map(str::to_string),
        links: record
            .payload
            .platforms()
            .map(|platforms| platforms.found_urls().map(str::to_string).collect())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookout_protocol::ResultPayload;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(query: &str) -> InvestigationRecord {
        InvestigationRecord::new(query, ResultPayload::default(), None)
    }

    fn state(records: Vec<InvestigationRecord>) -> HistoryState {
        HistoryState::new(HistorySnapshot::available(records), &HistoryConfig::default())
    }

    #[test]
    fn unavailable_is_not_empty() {
        let failed = HistoryState::new(
            HistorySnapshot::unavailable("connection refused"),
            &HistoryConfig::default(),
        );
        assert_eq!(failed.view(), HistoryView::unavailable());
        assert_eq!(state(Vec::new()).view(), HistoryView::empty());
    }

    #[test]
    fn filter_without_matches_reports_filter() {
        let view = state(vec![record("bob")])
            .with_filter(HistoryFilter::Only(InvestigationType::Phone))
            .view();
        assert_eq!(view, HistoryView::no_matches("phone"));
        assert_eq!(view.message(), Some("No phone searches found."));
    }

    #[test]
    fn rows_carry_presentation_metadata() {
        let view = state(vec![InvestigationRecord::new(
            "bob",
            ResultPayload::from_value(&json!({"github": {"exists": true}})),
            None,
        )])
        .view();
        let rows = view.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].kind, InvestigationType::Username);
        assert_eq!(rows[0].icon, "fa-at");
        assert_eq!(rows[0].found, 1);
        assert_eq!(rows[0].timestamp, None);
    }

    #[test]
    fn rows_surface_links_and_errors() {
        let view = state(vec![
            InvestigationRecord::new(
                "bob",
                ResultPayload::from_value(&json!({
                    "github": {"exists": true, "url": "https://github.com/bob"},
                    "gitlab": {"exists": false, "url": "https://gitlab.com/bob"}
                })),
                None,
            ),
            InvestigationRecord::new(
                "+14155551234",
                ResultPayload::from_value(&json!({
                    "type": "phone",
                    "phone_check": {"ok": false, "error": "Rate limit exceeded"}
                })),
                None,
            ),
        ])
        .with_sort(SortKey::Type)
        .view();
        let rows = view.rows();
        assert_eq!(rows[0].kind, InvestigationType::Phone);
        assert_eq!(rows[0].error.as_deref(), Some("Rate limit exceeded"));
        assert!(rows[0].links.is_empty());
        assert_eq!(rows[1].links, ["https://github.com/bob"]);
        assert_eq!(rows[1].error, None);
    }

    #[test]
    fn max_rows_truncates_but_reports_total() {
        let config = HistoryConfig {
            max_rows: Some(2),
            ..Default::default()
        };
        let records = vec![record("a"), record("b"), record("c")];
        let view = HistoryState::new(HistorySnapshot::available(records), &config).view();
        let HistoryView::Rows {
            total_matches,
            rows,
            ..
        } = view
        else {
            panic!("expected rows");
        };
        assert_eq!(total_matches, 3);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn max_rows_can_be_lifted() {
        let records = vec![record("a"), record("b"), record("c")];
        let view = state(records).with_max_rows(Some(1)).with_max_rows(None).view();
        assert_eq!(view.rows().len(), 3);
    }

    #[test]
    fn filter_changes_recompute_from_full_history() {
        let base = state(vec![record("a@b.c"), record("bob"), record("c@d.e")]);
        let narrowed = base
            .clone()
            .with_filter(HistoryFilter::Only(InvestigationType::Username));
        assert_eq!(narrowed.visible().len(), 1);

        let widened = narrowed.with_filter(HistoryFilter::All);
        assert_eq!(widened.visible().len(), 3);
        assert_eq!(widened, base);
    }

    #[test]
    fn live_record_is_appended() {
        let before = state(vec![record("bob")]);
        assert_eq!(before.stats().total, 1);
        let after = before.with_record(record("alice@example.com"));
        assert_eq!(after.stats().total, 2);
        assert_eq!(after.snapshot().records().len(), 2);
    }

    #[test]
    fn stats_ignore_active_filter() {
        let filtered = state(vec![record("a@b.c"), record("bob")])
            .with_filter(HistoryFilter::Only(InvestigationType::Email));
        assert_eq!(filtered.stats().total, 2);
    }
}
