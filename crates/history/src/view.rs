use std::cmp::Reverse;
use std::fmt;

use lookout_classifier::classify;
use lookout_protocol::{InvestigationRecord, InvestigationType};

use crate::collate::locale_cmp;

/// Which records the history list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryFilter {
    #[default]
    All,
    Only(InvestigationType),
}

impl HistoryFilter {
    /// Strict parse: `all` or a known type name.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "all" => Some(HistoryFilter::All),
            other => InvestigationType::from_tag(other).map(HistoryFilter::Only),
        }
    }

    /// Lenient parse: unrecognised tags pass everything through.
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        Self::from_tag(tag).unwrap_or_else(|| {
            log::debug!("unrecognised filter tag '{tag}', showing all records");
            HistoryFilter::All
        })
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HistoryFilter::All => "all",
            HistoryFilter::Only(kind) => kind.as_str(),
        }
    }

    #[must_use]
    pub fn admits(self, kind: InvestigationType) -> bool {
        match self {
            HistoryFilter::All => true,
            HistoryFilter::Only(wanted) => wanted == kind,
        }
    }
}

impl fmt::Display for HistoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order of the history list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Timestamp descending
    #[default]
    Recent,
    /// Timestamp ascending
    Oldest,
    /// Query ascending, locale comparison
    Alphabetical,
    /// Classified type name ascending
    Type,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Recent,
        SortKey::Oldest,
        SortKey::Alphabetical,
        SortKey::Type,
    ];

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim() {
            "recent" => Some(SortKey::Recent),
            "oldest" => Some(SortKey::Oldest),
            "alphabetical" => Some(SortKey::Alphabetical),
            "type" => Some(SortKey::Type),
            _ => None,
        }
    }

    /// Lenient parse: unrecognised keys order by most recent.
    #[must_use]
    pub fn parse(key: &str) -> Self {
        Self::from_key(key).unwrap_or_else(|| {
            log::debug!("unrecognised sort key '{key}', ordering by most recent");
            SortKey::Recent
        })
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SortKey::Recent => "recent",
            SortKey::Oldest => "oldest",
            SortKey::Alphabetical => "alphabetical",
            SortKey::Type => "type",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter then order the records. Sorting is stable: records with equal keys
/// keep their input order. The input is never modified.
#[must_use]
pub fn filter_and_sort(
    records: &[InvestigationRecord],
    filter: HistoryFilter,
    sort: SortKey,
) -> Vec<&InvestigationRecord> {
    classified(records, filter, sort)
        .into_iter()
        .map(|(_, record)| record)
        .collect()
}

/// [`filter_and_sort`] over raw filter tag and sort key strings.
#[must_use]
pub fn filter_and_sort_by_tags<'a>(
    records: &'a [InvestigationRecord],
    filter_tag: &str,
    sort_key: &str,
) -> Vec<&'a InvestigationRecord> {
    filter_and_sort(records, HistoryFilter::parse(filter_tag), SortKey::parse(sort_key))
}

/// Filtered, ordered records paired with their classified type.
pub(crate) fn classified(
    records: &[InvestigationRecord],
    filter: HistoryFilter,
    sort: SortKey,
) -> Vec<(InvestigationType, &InvestigationRecord)> {
    let mut matches: Vec<(InvestigationType, &InvestigationRecord)> = records
        .iter()
        .map(|record| (classify(record), record))
        .filter(|(kind, _)| filter.admits(*kind))
        .collect();

    match sort {
        SortKey::Recent => matches.sort_by_key(|(_, record)| Reverse(record.sort_instant())),
        SortKey::Oldest => matches.sort_by_key(|(_, record)| record.sort_instant()),
        SortKey::Alphabetical => matches.sort_by(|a, b| locale_cmp(&a.1.query, &b.1.query)),
        SortKey::Type => matches.sort_by_key(|(kind, _)| *kind),
    }

    matches
}
