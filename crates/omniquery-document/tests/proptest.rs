//! Property-based tests for flattening and type inference.

use omniquery_document::{
    flatten, infer_column_type, unflatten, ArrayNotation, FlattenOptions, ValueType,
};
use proptest::prelude::*;
use serde_json::{Map, Value};

// ============================================================================
// Strategies
// ============================================================================

fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,8}".prop_map(Value::String),
    ]
}

/// Object keys, including the empty key, digits and path punctuation.
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9.\\[\\]\\\\]{0,4}"
}

fn value_strategy() -> impl Strategy<Value = Value> {
    leaf_strategy().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(key_strategy(), inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn document_strategy() -> impl Strategy<Value = Value> {
    prop::collection::btree_map(key_strategy(), value_strategy(), 0..6)
        .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>()))
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// unflatten(flatten(d)) == d with default options.
    #[test]
    fn flatten_round_trips(doc in document_strategy()) {
        let fields = flatten(&doc, &FlattenOptions::default());
        prop_assert_eq!(unflatten(&fields), doc);
    }

    /// Bracket notation round trips as well.
    #[test]
    fn bracket_notation_round_trips(doc in document_strategy()) {
        let options = FlattenOptions::new().array_notation(ArrayNotation::Bracket);
        let fields = flatten(&doc, &options);
        prop_assert_eq!(unflatten(&fields), doc);
    }

    /// A depth limit never loses data.
    #[test]
    fn depth_limit_round_trips(doc in document_strategy(), depth in 0usize..4) {
        let fields = flatten(&doc, &FlattenOptions::new().max_depth(depth));
        prop_assert!(fields.iter().all(|f| f.depth <= depth));
        prop_assert_eq!(unflatten(&fields), doc);
    }

    /// Every emitted field has a path, and containers only add fields.
    #[test]
    fn paths_are_never_empty(doc in document_strategy()) {
        let leaves = flatten(&doc, &FlattenOptions::default());
        let with_containers = flatten(&doc, &FlattenOptions::new().include_containers(true));
        prop_assert!(leaves.iter().all(|f| !f.path.is_empty()));
        prop_assert!(with_containers.len() >= leaves.len());
    }

    /// Inference reports nulls exactly when a sampled value is null.
    #[test]
    fn inference_tracks_nulls(values in prop::collection::vec(leaf_strategy(), 0..30)) {
        let inferred = infer_column_type(&values, 100);
        prop_assert_eq!(inferred.has_nulls, values.iter().any(Value::is_null));
        prop_assert!(inferred.sample_values.len() <= 5);
        prop_assert_eq!(
            inferred.primary_type == ValueType::Null,
            values.iter().all(Value::is_null)
        );
    }
}
