//! # Lookout History
//!
//! Aggregation and display ordering over the investigation history.
//!
//! ```text
//! HistorySnapshot
//!     │
//!     ├──> Stats Aggregator   compute_stats → { total, found, by_type }
//!     │      └─ per-type FoundPolicy over the classified type
//!     │
//!     ├──> Filter/Sort Engine filter_and_sort(records, filter, sort)
//!     │      └─ stable; recent | oldest | alphabetical | type
//!     │
//!     └──> HistoryState       { snapshot, filter, sort } → HistoryView
//! ```
//!
//! Everything here is synchronous and pure. No function fails on malformed
//! records; only configuration loading returns [`HistoryError`].

mod collate;
mod config;
mod error;
mod state;
mod stats;
mod view;

pub use collate::locale_cmp;
pub use config::HistoryConfig;
pub use error::{HistoryError, Result};
pub use state::HistoryState;
pub use stats::{compute_stats, record_found, FoundPolicy};
pub use view::{filter_and_sort, filter_and_sort_by_tags, HistoryFilter, SortKey};

pub use lookout_classifier::classify;
pub use lookout_protocol::{
    HistoryRow, HistorySnapshot, HistoryStats, HistoryView, InvestigationRecord,
    InvestigationType, ResultPayload,
};
