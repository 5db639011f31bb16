//! Property-based tests for the shape and signature compatibility rules

use proptest::prelude::*;
use seam::contract::{OperationSignature, Shape};

fn leaf_shape() -> impl Strategy<Value = Shape> {
    prop_oneof![
        Just(Shape::Unit),
        Just(Shape::Bool),
        Just(Shape::Number),
        Just(Shape::Integer),
        Just(Shape::Text),
        Just(Shape::Any),
    ]
}

fn shape() -> impl Strategy<Value = Shape> {
    leaf_shape().prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(Shape::list),
            inner.clone().prop_map(Shape::optional),
            prop::collection::btree_map("[a-c]", inner, 0..3).prop_map(Shape::Record),
        ]
    })
}

proptest! {
    /// Every shape can stand in for itself and for `Any`
    #[test]
    fn test_subshape_is_reflexive(s in shape()) {
        prop_assert!(s.is_subshape_of(&s));
        prop_assert!(s.is_subshape_of(&Shape::Any));
    }

    /// A signature always satisfies itself
    #[test]
    fn test_signature_satisfies_itself(input in shape(), output in shape()) {
        let sig = OperationSignature::new("op", input, output);
        prop_assert!(sig.satisfies(&sig).is_ok());
    }

    /// Widening the provider's input to `Any` never breaks substitutability
    #[test]
    fn test_accepting_anything_is_always_allowed(input in shape(), output in shape()) {
        let required = OperationSignature::new("op", input, output.clone());
        let provider = OperationSignature::new("op", Shape::Any, output);
        prop_assert!(provider.satisfies(&required).is_ok());
    }

    /// Adding a failure condition the contract does not declare is always rejected
    #[test]
    fn test_extra_failure_is_always_rejected(input in shape(), output in shape(), condition in "[a-z_]{1,12}") {
        let required = OperationSignature::new("op", input, output);
        let provider = required.clone().fails_with(condition);
        prop_assert!(provider.satisfies(&required).is_err());
    }
}
