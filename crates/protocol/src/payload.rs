use serde_json::{Map, Value};

use crate::InvestigationType;

/// Keys that identify the subject of an IP lookup.
const IP_IDENTITY_KEYS: &[&str] = &["ip", "ip_address", "address"];

/// `{ ok, error? }` envelope shared by email, phone and name lookups.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LookupOutcome {
    pub ok: bool,
    pub error: Option<String>,
}

impl LookupOutcome {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            ok: obj.get("ok").and_then(Value::as_bool).unwrap_or(false),
            error: error_message(obj),
        }
    }
}

fn error_message(obj: &Map<String, Value>) -> Option<String> {
    obj.get("error")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

/// Presence of the queried handle on one platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformEntry {
    pub platform: String,
    pub exists: bool,
    pub url: Option<String>,
}

/// Platform name → presence mapping (username checks, enhanced username checks).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlatformPresence {
    entries: Vec<PlatformEntry>,
}

impl PlatformPresence {
    /// Entries whose value is not an object are skipped; a missing or
    /// non-boolean `exists` reads as `false`.
    fn from_object(obj: &Map<String, Value>) -> Self {
        let entries = obj
            .iter()
            .filter_map(|(platform, info)| {
                let info = info.as_object()?;
                Some(PlatformEntry {
                    platform: platform.clone(),
                    exists: info.get("exists").and_then(Value::as_bool).unwrap_or(false),
                    url: info.get("url").and_then(Value::as_str).map(str::to_string),
                })
            })
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[PlatformEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of platforms on which the handle exists.
    #[must_use]
    pub fn found(&self) -> usize {
        self.entries.iter().filter(|entry| entry.exists).count()
    }

    /// Profile URLs of the platforms on which the handle exists.
    pub fn found_urls(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .iter()
            .filter(|entry| entry.exists)
            .filter_map(|entry| entry.url.as_deref())
    }
}

/// IP lookup body: either the direct data object or an `{ ok, data }` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IpLookup {
    pub address: Option<String>,
    pub error: Option<String>,
}

impl IpLookup {
    fn from_object(obj: &Map<String, Value>) -> Self {
        let address = ip_identity(obj).or_else(|| {
            obj.get("data")
                .and_then(Value::as_object)
                .and_then(ip_identity)
        });
        Self {
            address,
            error: error_message(obj),
        }
    }

    /// The lookup names the address it describes.
    #[must_use]
    pub fn is_identified(&self) -> bool {
        self.address.is_some()
    }
}

fn ip_identity(obj: &Map<String, Value>) -> Option<String> {
    IP_IDENTITY_KEYS.iter().find_map(|key| {
        obj.get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    })
}

/// Enhanced checks keep their platform map under either key spelling.
fn enhanced_platforms(obj: &Map<String, Value>) -> PlatformPresence {
    obj.get("platform_results")
        .or_else(|| obj.get("platformResults"))
        .and_then(Value::as_object)
        .map(PlatformPresence::from_object)
        .unwrap_or_default()
}

/// Payload without a recognised `type` tag.
///
/// Every view is extracted up front; the classified type decides which one
/// the found-count policy reads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UntaggedPayload {
    /// Non-empty tag string that is not one of the known types, e.g. the
    /// backend's `bulk_search` rows.
    pub unknown_tag: Option<String>,
    pub outcome: LookupOutcome,
    pub platforms: PlatformPresence,
    pub ip: IpLookup,
}

impl UntaggedPayload {
    fn from_object(obj: &Map<String, Value>, unknown_tag: Option<&str>) -> Self {
        Self {
            unknown_tag: unknown_tag
                .filter(|tag| !tag.is_empty())
                .map(str::to_string),
            outcome: LookupOutcome::from_object(obj),
            platforms: PlatformPresence::from_object(obj),
            ip: IpLookup::from_object(obj),
        }
    }
}

/// Result payload of one investigation, validated once at ingestion.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultPayload {
    Username(PlatformPresence),
    Email(LookupOutcome),
    Phone(LookupOutcome),
    Ip(IpLookup),
    Name(LookupOutcome),
    EnhancedUsername(PlatformPresence),
    Untagged(UntaggedPayload),
}

impl Default for ResultPayload {
    fn default() -> Self {
        ResultPayload::Untagged(UntaggedPayload::default())
    }
}

impl ResultPayload {
    /// Decode any JSON value. Never fails: shapes that carry nothing usable
    /// decode to an empty untagged payload.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(obj) => Self::from_object(obj),
            // Older history rows stored the payload double-encoded.
            Value::String(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(obj)) => Self::from_object(&obj),
                _ => Self::default(),
            },
            _ => Self::default(),
        }
    }

    /// Decode the response of a live search.
    ///
    /// Besides the tagged shapes this accepts the backward compatible
    /// `{ username, results }` form of plain username checks.
    #[must_use]
    pub fn from_live_response(value: &Value) -> Self {
        if let Some(obj) = value.as_object() {
            let tagged = obj
                .get("type")
                .and_then(Value::as_str)
                .and_then(InvestigationType::from_tag)
                .is_some();
            if !tagged && obj.get("username").is_some_and(Value::is_string) {
                if let Some(results) = obj.get("results").and_then(Value::as_object) {
                    return ResultPayload::Username(PlatformPresence::from_object(results));
                }
            }
        }
        Self::from_value(value)
    }

    fn from_object(obj: &Map<String, Value>) -> Self {
        let raw_tag = obj.get("type").and_then(Value::as_str);
        let Some(kind) = raw_tag.and_then(InvestigationType::from_tag) else {
            if let Some(tag) = raw_tag {
                log::debug!("ignoring unrecognised payload tag '{tag}'");
            }
            return ResultPayload::Untagged(UntaggedPayload::from_object(obj, raw_tag));
        };

        let body = obj
            .get(kind.nested_key())
            .and_then(Value::as_object)
            .unwrap_or(obj);

        match kind {
            InvestigationType::Username => {
                ResultPayload::Username(PlatformPresence::from_object(body))
            }
            InvestigationType::Email => ResultPayload::Email(LookupOutcome::from_object(body)),
            InvestigationType::Phone => ResultPayload::Phone(LookupOutcome::from_object(body)),
            InvestigationType::Ip => ResultPayload::Ip(IpLookup::from_object(body)),
            InvestigationType::Name => ResultPayload::Name(LookupOutcome::from_object(body)),
            InvestigationType::EnhancedUsername => {
                ResultPayload::EnhancedUsername(enhanced_platforms(body))
            }
        }
    }

    /// The recognised `type` tag, if the payload carried one.
    #[must_use]
    pub const fn tag(&self) -> Option<InvestigationType> {
        match self {
            ResultPayload::Username(_) => Some(InvestigationType::Username),
            ResultPayload::Email(_) => Some(InvestigationType::Email),
            ResultPayload::Phone(_) => Some(InvestigationType::Phone),
            ResultPayload::Ip(_) => Some(InvestigationType::Ip),
            ResultPayload::Name(_) => Some(InvestigationType::Name),
            ResultPayload::EnhancedUsername(_) => Some(InvestigationType::EnhancedUsername),
            ResultPayload::Untagged(_) => None,
        }
    }

    /// The payload carried a non-empty `type` tag, recognised or not.
    #[must_use]
    pub const fn carries_type_tag(&self) -> bool {
        match self {
            ResultPayload::Untagged(untagged) => untagged.unknown_tag.is_some(),
            _ => true,
        }
    }

    /// Error message reported by the lookup, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            ResultPayload::Email(outcome)
            | ResultPayload::Phone(outcome)
            | ResultPayload::Name(outcome) => outcome.error.as_deref(),
            ResultPayload::Ip(lookup) => lookup.error.as_deref(),
            ResultPayload::Untagged(untagged) => untagged
                .outcome
                .error
                .as_deref()
                .or(untagged.ip.error.as_deref()),
            ResultPayload::Username(_) | ResultPayload::EnhancedUsername(_) => None,
        }
    }

    #[must_use]
    pub const fn outcome(&self) -> Option<&LookupOutcome> {
        match self {
            ResultPayload::Email(outcome)
            | ResultPayload::Phone(outcome)
            | ResultPayload::Name(outcome) => Some(outcome),
            ResultPayload::Untagged(untagged) => Some(&untagged.outcome),
            _ => None,
        }
    }

    #[must_use]
    pub const fn platforms(&self) -> Option<&PlatformPresence> {
        match self {
            ResultPayload::Username(platforms) => Some(platforms),
            ResultPayload::EnhancedUsername(platforms) => Some(platforms),
            ResultPayload::Untagged(untagged) => Some(&untagged.platforms),
            _ => None,
        }
    }

    #[must_use]
    pub const fn ip(&self) -> Option<&IpLookup> {
        match self {
            ResultPayload::Ip(lookup) => Some(lookup),
            ResultPayload::Untagged(untagged) => Some(&untagged.ip),
            _ => None,
        }
    }
}
