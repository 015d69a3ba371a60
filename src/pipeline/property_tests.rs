//! Property-Based Tests for the Pipeline
//!
//! Verifies the round-trip law: any JSON-representable value stored through
//! the pipeline is returned deep-equal, on both the compressed and the
//! uncompressed storage path.

use proptest::prelude::*;
use serde_json::Value;

use crate::pipeline::{Cache, SetOptions};
use crate::config::CacheConfig;
use crate::store::MemoryStore;

// == Strategies ==
/// Arbitrary JSON trees, bounded in depth and size. Numbers are integers so
/// equality is exact.
fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,16}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::hash_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Round-trip law: get(k) after set(k, v) is deep-equal to v, whether or
    // not compression was requested (and whether or not it was adopted).
    #[test]
    fn prop_round_trip(value in json_value_strategy(), gzip in any::<bool>()) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");

        rt.block_on(async {
            let cache = Cache::new(MemoryStore::new(64), CacheConfig::new());
            cache
                .set("k", &value, None, SetOptions { gzip, nx: false })
                .await
                .expect("set");

            let revived = cache.get("k").await.expect("get");
            prop_assert_eq!(revived, Some(value));
            Ok(())
        })?;
    }

    // The raw stored form is always the canonical serialization or a framed
    // compressed representation of it, never anything else.
    #[test]
    fn prop_stored_form_is_canonical_or_framed(value in json_value_strategy()) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");

        rt.block_on(async {
            let cache = Cache::new(MemoryStore::new(64), CacheConfig::new());
            cache
                .set("k", &value, None, SetOptions { gzip: true, nx: false })
                .await
                .expect("set");

            let stored = cache.get_raw("k").await.expect("get_raw").expect("present");
            let canonical = serde_json::to_string(&value).expect("serialize");
            if let Some(raw) = super::compress::decode(&stored) {
                prop_assert_eq!(raw, canonical);
            } else {
                prop_assert_eq!(stored, canonical);
            }
            Ok(())
        })?;
    }
}
