use std::fmt;
use std::sync::OnceLock;

use lookout_protocol::InvestigationType;
use regex::Regex;

/// One heuristic: a named predicate over the raw query and the type it implies.
pub struct HeuristicRule {
    pub name: &'static str,
    pub kind: InvestigationType,
    predicate: fn(&str) -> bool,
}

impl HeuristicRule {
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        (self.predicate)(query)
    }
}

impl fmt::Debug for HeuristicRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeuristicRule")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Heuristics in priority order; the first match wins. Queries matching none
/// of them are usernames.
pub static HEURISTIC_RULES: [HeuristicRule; 5] = [
    HeuristicRule {
        name: "email",
        kind: InvestigationType::Email,
        predicate: looks_like_email,
    },
    HeuristicRule {
        name: "phone",
        kind: InvestigationType::Phone,
        predicate: looks_like_phone,
    },
    HeuristicRule {
        name: "ipv4",
        kind: InvestigationType::Ip,
        predicate: looks_like_ipv4,
    },
    HeuristicRule {
        name: "ipv6",
        kind: InvestigationType::Ip,
        predicate: looks_like_ipv6,
    },
    HeuristicRule {
        name: "name",
        kind: InvestigationType::Name,
        predicate: looks_like_name,
    },
];

/// Type assigned when no heuristic matches.
pub const FALLBACK: InvestigationType = InvestigationType::Username;

fn pattern(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("heuristic pattern is valid"))
}

fn looks_like_email(query: &str) -> bool {
    query.contains('@')
}

/// Optional `+` followed by a run of digits; the rest of the query is not
/// inspected. Whole-query IP addresses are left to the IP rules.
fn looks_like_phone(query: &str) -> bool {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    pattern(&PHONE, r"^\+?[0-9]+").is_match(query)
        && !looks_like_ipv4(query)
        && !looks_like_ipv6(query)
}

/// Loose dotted quad; octet ranges are not checked.
fn looks_like_ipv4(query: &str) -> bool {
    static IPV4: OnceLock<Regex> = OnceLock::new();
    pattern(&IPV4, r"^[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+$").is_match(query)
}

/// Hex digits and colons with at least one colon. Not a strict address check.
fn looks_like_ipv6(query: &str) -> bool {
    static IPV6: OnceLock<Regex> = OnceLock::new();
    query.contains(':') && pattern(&IPV6, r"^[0-9A-Fa-f:]+$").is_match(query)
}

fn looks_like_name(query: &str) -> bool {
    query.contains(' ') && query.split_whitespace().nth(1).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str) -> &'static HeuristicRule {
        HEURISTIC_RULES
            .iter()
            .find(|rule| rule.name == name)
            .expect("rule exists")
    }

    #[test]
    fn rules_are_in_priority_order() {
        let names: Vec<&str> = HEURISTIC_RULES.iter().map(|rule| rule.name).collect();
        assert_eq!(names, ["email", "phone", "ipv4", "ipv6", "name"]);
    }

    #[test]
    fn phone_rule() {
        let phone = rule("phone");
        assert!(phone.matches("+14155551234"));
        assert!(phone.matches("+1 415 555 1234"));
        assert!(phone.matches("4155551234"));
        assert!(phone.matches("415-555-1234"));
        assert!(phone.matches("+1.415.555.1234"));
        assert!(phone.matches("123abc"));
        assert!(phone.matches("1337hacker"));
        assert!(!phone.matches("(415) 555-1234"));
        assert!(!phone.matches("+"));
        assert!(!phone.matches("+abc"));
        assert!(!phone.matches(""));
    }

    #[test]
    fn phone_rule_leaves_addresses_to_ip_rules() {
        let phone = rule("phone");
        assert!(!phone.matches("192.168.1.1"));
        assert!(!phone.matches("999.999.999.999"));
        assert!(!phone.matches("2001:db8::1"));
        assert!(!phone.matches("2001:4860:4860::8888"));
        assert!(phone.matches("192.168.1"));
        assert!(phone.matches("2001:db8::zz"));
    }

    #[test]
    fn ipv4_rule_is_loose() {
        let ipv4 = rule("ipv4");
        assert!(ipv4.matches("192.168.1.1"));
        assert!(ipv4.matches("999.999.999.999"));
        assert!(!ipv4.matches("192.168.1"));
        assert!(!ipv4.matches("192.168.1.1 "));
    }

    #[test]
    fn ipv6_rule_requires_a_colon() {
        let ipv6 = rule("ipv6");
        assert!(ipv6.matches("2001:db8::1"));
        assert!(ipv6.matches("::"));
        assert!(ipv6.matches("cafe:babe"));
        assert!(!ipv6.matches("deadbeef"));
        assert!(!ipv6.matches("2001:db8::zz"));
    }

    #[test]
    fn name_rule_needs_two_tokens() {
        let name = rule("name");
        assert!(name.matches("John Smith"));
        assert!(name.matches("Mary Ann  Jones"));
        assert!(!name.matches(" alice"));
        assert!(!name.matches("alice "));
        assert!(!name.matches("alice"));
        assert!(!name.matches("John\tSmith"));
    }
}
