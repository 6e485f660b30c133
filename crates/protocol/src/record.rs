use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::ResultPayload;

/// Naive timestamp layouts written by the backend (`datetime.isoformat()` and
/// SQLite's `CURRENT_TIMESTAMP`). Interpreted as UTC.
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// One past or current investigation. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct InvestigationRecord {
    pub query: String,
    pub payload: ResultPayload,
    pub timestamp: Option<DateTime<Utc>>,
}

impl InvestigationRecord {
    #[must_use]
    pub fn new(
        query: impl Into<String>,
        payload: ResultPayload,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            query: query.into(),
            payload,
            timestamp,
        }
    }

    /// Build a record from a freshly completed search.
    #[must_use]
    pub fn from_live(query: impl Into<String>, response: &Value, completed_at: DateTime<Utc>) -> Self {
        Self::new(
            query,
            ResultPayload::from_live_response(response),
            Some(completed_at),
        )
    }

    /// Decode one history entry. Missing or mistyped fields fall back to
    /// defaults: empty query, empty payload, no timestamp.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let field = |names: &[&str]| names.iter().find_map(|name| value.get(*name));

        let query = match field(&["username", "query"]) {
            Some(Value::String(query)) => query.clone(),
            Some(Value::Number(number)) => number.to_string(),
            _ => String::new(),
        };
        let payload = field(&["result", "resultPayload"])
            .map(ResultPayload::from_value)
            .unwrap_or_default();
        let timestamp = field(&["checked_at", "timestamp"])
            .and_then(Value::as_str)
            .and_then(parse_timestamp);

        if query.is_empty() {
            log::debug!("history entry without a query: {value}");
        }

        Self {
            query,
            payload,
            timestamp,
        }
    }

    /// Instant used for ordering; records without a timestamp sort first.
    #[must_use]
    pub fn sort_instant(&self) -> DateTime<Utc> {
        self.timestamp.unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Parse RFC 3339 or the backend's naive ISO-8601 layouts.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}

/// History as handed to the core by the retrieval layer.
///
/// `Unavailable` is supplied by the caller when retrieval failed, so that a
/// failure is never confused with an empty history.
#[derive(Debug, Clone, PartialEq)]
pub enum HistorySnapshot {
    Available(Vec<InvestigationRecord>),
    Unavailable { reason: String },
}

impl HistorySnapshot {
    #[must_use]
    pub const fn available(records: Vec<InvestigationRecord>) -> Self {
        HistorySnapshot::Available(records)
    }

    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        HistorySnapshot::Unavailable {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, HistorySnapshot::Available(_))
    }

    /// Records of the snapshot; empty when unavailable.
    #[must_use]
    pub fn records(&self) -> &[InvestigationRecord] {
        match self {
            HistorySnapshot::Available(records) => records,
            HistorySnapshot::Unavailable { .. } => &[],
        }
    }

    /// Append a record. An unavailable snapshot becomes available with just
    /// that record, since the live result is known to exist.
    #[must_use]
    pub fn with_record(self, record: InvestigationRecord) -> Self {
        match self {
            HistorySnapshot::Available(mut records) => {
                records.push(record);
                HistorySnapshot::Available(records)
            }
            HistorySnapshot::Unavailable { .. } => HistorySnapshot::Available(vec![record]),
        }
    }
}

#[derive(Deserialize)]
struct HistoryDocument {
    #[serde(default)]
    history: Option<Vec<Value>>,
}

/// Decode the `/api/history` document.
///
/// Individual entries never fail; only a document that is not JSON or whose
/// `history` is not an array is an error. A missing `history` is empty.
pub fn decode_history_document(bytes: &[u8]) -> Result<Vec<InvestigationRecord>> {
    let document: HistoryDocument =
        serde_json::from_slice(bytes).context("Invalid history document")?;
    let entries = document.history.unwrap_or_default();
    Ok(entries.iter().map(InvestigationRecord::from_value).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InvestigationType;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_backend_timestamp_layouts() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-05-01T12:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01 12:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T12:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-05-01T14:30:00+02:00"), Some(expected));
        assert!(parse_timestamp("2024-05-01T12:30:00.123456").is_some());
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn decodes_history_document() {
        let body = json!({
            "history": [
                {
                    "username": "bob@x.com",
                    "result": {"type": "email", "email_check": {"ok": true}},
                    "checked_at": "2024-05-01T12:30:00"
                },
                {"username": 12345, "result": null},
                "garbage"
            ]
        });
        let records = decode_history_document(body.to_string().as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].query, "bob@x.com");
        assert_eq!(records[0].payload.tag(), Some(InvestigationType::Email));
        assert!(records[0].timestamp.is_some());
        assert_eq!(records[1].query, "12345");
        assert_eq!(records[1].timestamp, None);
        assert_eq!(records[2].query, "");
        assert_eq!(records[2].payload, ResultPayload::default());
    }

    #[test]
    fn missing_history_is_empty() {
        assert!(decode_history_document(b"{}").unwrap().is_empty());
        assert!(decode_history_document(b"{\"history\": null}").unwrap().is_empty());
    }

    #[test]
    fn undecodable_documents_are_errors() {
        assert!(decode_history_document(b"<html>").is_err());
        assert!(decode_history_document(b"{\"history\": \"nope\"}").is_err());
        assert!(decode_history_document(b"42").is_err());
    }

    #[test]
    fn records_without_timestamp_sort_first() {
        let record = InvestigationRecord::new("bob", ResultPayload::default(), None);
        assert_eq!(record.sort_instant(), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn snapshot_distinguishes_unavailable_from_empty() {
        let empty = HistorySnapshot::available(Vec::new());
        let failed = HistorySnapshot::unavailable("timeout");
        assert!(empty.is_available());
        assert!(!failed.is_available());
        assert!(failed.records().is_empty());

        let record = InvestigationRecord::new("bob", ResultPayload::default(), None);
        let recovered = failed.with_record(record);
        assert!(recovered.is_available());
        assert_eq!(recovered.records().len(), 1);
    }
}
