use tests::*;
use tests::assert_eq;

use sapling::transform::Registry;

#[test]
fn reversible_transformers_round_trip() {
    let registry = fixtures::registry();

    for input in ["0", "1", "-1", "1699", "9223372036854775807", "-9223372036854775808"] {
        let input = Value::from(input);
        let forward = registry
            .transform(fixtures::STRING_TO_INT, input.clone())
            .unwrap();
        let back = registry
            .reverse_transform(fixtures::STRING_TO_INT, forward)
            .unwrap();
        assert_eq!(input, back);
    }
}

#[test]
fn one_way_transformer_has_no_inverse() {
    let registry = fixtures::registry();

    assert!(!registry.allows_reverse(fixtures::UPPERCASE));
    assert!(registry
        .reverse_transform(fixtures::UPPERCASE, Value::from("DC"))
        .unwrap_err()
        .is_unsupported_reverse_transform());
}

#[test]
fn null_bypasses_transformers() {
    let mut registry = Registry::new();
    registry.register_fn("Panics", |_: String| -> Option<String> {
        panic!("transformers never see null")
    });

    assert_eq!(Value::Null, registry.transform("Panics", Value::Null).unwrap());
}

#[test]
fn rejected_input_is_reported() {
    let registry = fixtures::registry();

    let err = registry
        .transform(fixtures::STRING_TO_INT, Value::from("one"))
        .unwrap_err();
    assert!(err.is_invalid_transform_input());
    assert_eq!(
        r#"transformer `StringToInt` rejected String("one")"#,
        err.to_string()
    );
}
