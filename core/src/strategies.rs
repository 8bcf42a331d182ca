//! proptest strategies for the protocol types.

use proptest::collection::{btree_map, vec};
use proptest::prelude::*;
use serde_json::Value;

use crate::{Failure, Log, Rectifier};

/// JSON without floats, so values compare equal after a round-trip.
pub fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        ".{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            vec(inner.clone(), 0..4).prop_map(Value::Array),
            btree_map("[A-Za-z_]{1,8}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

pub fn rectifier() -> impl Strategy<Value = Rectifier> {
    prop_oneof![
        Just(Rectifier::nil()),
        (
            json_value(),
            "(https?://[a-z]{1,8}(\\.local)?)?(/[a-z0-9]{1,6}){0,3}",
            "([a-z]{1,4}=[a-z0-9%]{0,6}&?){0,3}",
            prop_oneof![Just(""), Just("GET"), Just("POST"), Just("PUT"), Just("DELETE")],
        )
            .prop_map(|(rectify, target_domain, target_query, method)| Rectifier {
                rectify,
                target_domain,
                target_query,
                method: method.to_string(),
            }),
    ]
}

pub fn failure() -> impl Strategy<Value = Failure> {
    (any::<i64>(), ".{0,16}", ".{1,32}", any::<bool>(), rectifier()).prop_map(
        |(code, origin, message, fatal, rectifier)| Failure {
            code,
            origin,
            message,
            fatal,
            rectifier,
        },
    )
}

/// Logs built through the public API, sometimes made fatal by merging in a
/// fatal log that has no failures of its own.
pub fn log() -> impl Strategy<Value = Log> {
    (vec(failure(), 0..6), vec(".{0,24}", 0..4), any::<bool>()).prop_map(
        |(failures, messages, merged_fatal)| {
            let mut log = Log::new();
            for f in failures {
                log.add_failure(f);
            }
            for m in messages {
                log.add_message(m);
            }
            if merged_fatal {
                let fatal: Log = serde_json::from_value(serde_json::json!({"Fatality": true}))
                    .expect("fatal log decodes");
                log.merge_logs(fatal);
            }
            log
        },
    )
}
