//! # Lookout Protocol
//!
//! Wire types shared by the Lookout crates: the investigation type enum, the
//! result payload tagged union, history records and snapshots, and the render
//! contract handed to the history list renderer.
//!
//! Ingestion is total: any JSON value decodes into a record. Only a history
//! document that cannot be read at all is reported as an error, which the
//! caller turns into [`HistorySnapshot::Unavailable`].

use anyhow::Result;
use serde::Serialize;

mod kind;
mod payload;
mod record;
mod view;

pub use kind::InvestigationType;
pub use payload::{
    IpLookup, LookupOutcome, PlatformEntry, PlatformPresence, ResultPayload, UntaggedPayload,
};
pub use record::{decode_history_document, parse_timestamp, HistorySnapshot, InvestigationRecord};
pub use view::{HistoryRow, HistoryStats, HistoryView, EMPTY_MESSAGE, UNAVAILABLE_MESSAGE};

pub const RENDER_CONTRACT_VERSION: u32 = 1;

/// JSON Schema of the render contract (view and stats payloads).
pub fn render_contract_schema() -> Result<serde_json::Value> {
    Ok(serde_json::json!({
        "version": RENDER_CONTRACT_VERSION,
        "view": serde_json::to_value(schemars::schema_for!(HistoryView))?,
        "stats": serde_json::to_value(schemars::schema_for!(HistoryStats))?,
    }))
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}
