use std::cmp::Ordering;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Canonical investigation type assigned to every history record.
///
/// Ordering follows the wire name, which is also the order used when the
/// history is sorted by type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum InvestigationType {
    Username,
    Email,
    Phone,
    Ip,
    Name,
    EnhancedUsername,
}

impl InvestigationType {
    pub const ALL: [InvestigationType; 6] = [
        InvestigationType::Username,
        InvestigationType::Email,
        InvestigationType::Phone,
        InvestigationType::Ip,
        InvestigationType::Name,
        InvestigationType::EnhancedUsername,
    ];

    /// Wire name, as carried in the backend's `type` tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            InvestigationType::Username => "username",
            InvestigationType::Email => "email",
            InvestigationType::Phone => "phone",
            InvestigationType::Ip => "ip",
            InvestigationType::Name => "name",
            InvestigationType::EnhancedUsername => "enhanced_username",
        }
    }

    /// Parse a `type` tag. Only the six known tags are recognised.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "username" => Some(InvestigationType::Username),
            "email" => Some(InvestigationType::Email),
            "phone" => Some(InvestigationType::Phone),
            "ip" => Some(InvestigationType::Ip),
            "name" => Some(InvestigationType::Name),
            "enhanced_username" | "enhancedUsername" => Some(InvestigationType::EnhancedUsername),
            _ => None,
        }
    }

    /// Human readable label for badges.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            InvestigationType::Username => "Username",
            InvestigationType::Email => "Email",
            InvestigationType::Phone => "Phone",
            InvestigationType::Ip => "IP address",
            InvestigationType::Name => "Name",
            InvestigationType::EnhancedUsername => "Enhanced username",
        }
    }

    /// Icon identifier used by the history list renderer.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            InvestigationType::Username => "fa-at",
            InvestigationType::Email => "fa-envelope",
            InvestigationType::Phone => "fa-phone",
            InvestigationType::Ip => "fa-globe",
            InvestigationType::Name => "fa-user",
            InvestigationType::EnhancedUsername => "fa-search",
        }
    }

    /// Key under which the backend nests the lookup body for tagged payloads.
    pub(crate) const fn nested_key(self) -> &'static str {
        match self {
            InvestigationType::Username => "username_results",
            InvestigationType::Email => "email_check",
            InvestigationType::Phone => "phone_check",
            InvestigationType::Ip => "ip_check",
            InvestigationType::Name => "name_check",
            InvestigationType::EnhancedUsername => "enhanced_check",
        }
    }
}

impl Ord for InvestigationType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for InvestigationType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for InvestigationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
