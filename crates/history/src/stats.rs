use lookout_classifier::classify;
use lookout_protocol::{
    HistoryStats, InvestigationRecord, InvestigationType, IpLookup, PlatformPresence,
    ResultPayload,
};

/// How a record of a given type contributes to the found counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoundPolicy {
    /// One per platform entry with `exists == true`
    PlatformHits,
    /// One if the outcome is `ok` or the payload carried any type tag
    OutcomeOrTag,
    /// One if the lookup names the address it describes
    IdentifiedAddress,
    /// Always one: the investigation completed
    Completed,
}

impl FoundPolicy {
    #[must_use]
    pub const fn for_type(kind: InvestigationType) -> Self {
        match kind {
            InvestigationType::Username => FoundPolicy::PlatformHits,
            InvestigationType::Email | InvestigationType::Phone | InvestigationType::Name => {
                FoundPolicy::OutcomeOrTag
            }
            InvestigationType::Ip => FoundPolicy::IdentifiedAddress,
            InvestigationType::EnhancedUsername => FoundPolicy::Completed,
        }
    }

    /// Apply the policy to a payload. Missing views count as not found.
    #[must_use]
    pub fn count(self, payload: &ResultPayload) -> usize {
        match self {
            FoundPolicy::PlatformHits => payload.platforms().map_or(0, PlatformPresence::found),
            FoundPolicy::OutcomeOrTag => {
                usize::from(payload.carries_type_tag() || payload.outcome().is_some_and(|o| o.ok))
            }
            FoundPolicy::IdentifiedAddress => {
                usize::from(payload.ip().is_some_and(IpLookup::is_identified))
            }
            FoundPolicy::Completed => 1,
        }
    }
}

pub(crate) fn found_for(kind: InvestigationType, record: &InvestigationRecord) -> usize {
    FoundPolicy::for_type(kind).count(&record.payload)
}

/// One record's contribution to the found counter.
#[must_use]
pub fn record_found(record: &InvestigationRecord) -> usize {
    found_for(classify(record), record)
}

/// Summary counters over a record collection. Total over any input.
#[must_use]
pub fn compute_stats(records: &[InvestigationRecord]) -> HistoryStats {
    let mut stats = HistoryStats {
        total: records.len(),
        ..Default::default()
    };
    for record in records {
        let kind = classify(record);
        stats.found += found_for(kind, record);
        *stats.by_type.entry(kind.as_str().to_string()).or_default() += 1;
    }
    stats
}
