//! Property-based tests for the structural XML and JSON codecs
//!
//! Arbitrary trees (nested lists and mappings, empty containers, nulls,
//! awkward keys) must survive encode/decode unchanged.

use melody_storage::{Codec, JsonCodec, XmlCodec};
use proptest::prelude::*;
use serde_json::{Map, Value};

// ===== Helpers =====

fn arbitrary_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1.0e9f64..1.0e9).prop_map(Value::from),
        "[a-zA-Z0-9 ,<>&'\"é♫\u{FFFE}\u{FFFF}\t\n-]{0,12}".prop_map(Value::String),
    ]
}

fn arbitrary_key() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-z_][a-z0-9_]{0,8}",
        1 => Just("item".to_string()),
        1 => "[0-9 ]{1,4}",
        1 => Just("xmlns".to_string()),
    ]
}

fn arbitrary_tree() -> impl Strategy<Value = Value> {
    arbitrary_leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec((arbitrary_key(), inner), 0..6)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

// ===== Property Tests =====

proptest! {
    /// Property: structural XML reproduces any tree exactly
    #[test]
    fn structural_xml_round_trip(trees in prop::collection::vec(arbitrary_tree(), 0..5)) {
        let codec = XmlCodec::structural();
        let text = codec.encode(&trees).unwrap();
        prop_assert_eq!(codec.decode(&text).unwrap(), trees);
    }

    /// Property: JSON reproduces any tree exactly
    #[test]
    fn json_round_trip(trees in prop::collection::vec(arbitrary_tree(), 0..5), indent in 0usize..8) {
        let codec = JsonCodec::new(indent);
        let text = codec.encode(&trees).unwrap();
        prop_assert_eq!(codec.decode(&text).unwrap(), trees);
    }
}

#[test]
fn structural_xml_empty_list_and_null() {
    let codec = XmlCodec::structural();
    let trees = vec![serde_json::json!({ "contents": [], "source_id": null })];

    assert_eq!(codec.decode(&codec.encode(&trees).unwrap()).unwrap(), trees);
}
