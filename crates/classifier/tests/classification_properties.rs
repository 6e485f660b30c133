use lookout_classifier::{classify, InvestigationClassifier, InvestigationType};
use lookout_protocol::{InvestigationRecord, ResultPayload};
use proptest::prelude::*;
use serde_json::{json, Value};

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z_]{0,12}".prop_map(Value::String),
        prop_oneof![
            Just("email"),
            Just("phone"),
            Just("ip"),
            Just("name"),
            Just("username"),
            Just("enhanced_username"),
            Just("bogus"),
        ]
        .prop_map(|tag| json!({ "type": tag })),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z_]{1,10}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn classification_is_total_and_deterministic(query in ".{0,40}", payload in arb_json()) {
        let record = InvestigationRecord::new(query, ResultPayload::from_value(&payload), None);
        let first = classify(&record);
        let second = classify(&record.clone());
        prop_assert_eq!(first, second);
        prop_assert!(InvestigationType::ALL.contains(&first));
    }

    #[test]
    fn recognised_tag_wins_over_query(
        query in ".{0,40}",
        kind in prop::sample::select(InvestigationType::ALL.to_vec()),
    ) {
        let payload = ResultPayload::from_value(&json!({ "type": kind.as_str() }));
        let record = InvestigationRecord::new(query, payload, None);
        prop_assert_eq!(classify(&record), kind);
    }

    #[test]
    fn at_sign_always_means_email(local in "[a-z0-9+ .]{0,12}", domain in "[a-z0-9 .]{0,12}") {
        let query = format!("{local}@{domain}");
        prop_assert_eq!(InvestigationClassifier::classify_query(&query), InvestigationType::Email);
    }

    #[test]
    fn spaced_phone_numbers_stay_phones(groups in prop::collection::vec("[0-9]{2,4}", 2..5)) {
        let query = format!("+{}", groups.join(" "));
        prop_assert_eq!(InvestigationClassifier::classify_query(&query), InvestigationType::Phone);
    }

    #[test]
    fn digit_led_queries_are_phones(digits in "\\+?[0-9]{1,12}", rest in "[a-z .()-]{0,12}") {
        let query = format!("{digits}{rest}");
        prop_assert_eq!(InvestigationClassifier::classify_query(&query), InvestigationType::Phone);
    }

    #[test]
    fn dotted_quads_are_ips(a in 0u16..1000, b in 0u16..1000, c in 0u16..1000, d in 0u16..1000) {
        let query = format!("{a}.{b}.{c}.{d}");
        prop_assert_eq!(InvestigationClassifier::classify_query(&query), InvestigationType::Ip);
    }

    #[test]
    fn plain_handles_are_usernames(handle in "[a-z][a-z0-9_]{0,15}") {
        prop_assert_eq!(InvestigationClassifier::classify_query(&handle), InvestigationType::Username);
    }
}
