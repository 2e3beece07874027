use tests::*;
use tests::assert_eq;

use sapling::{DuplicatePolicy, Error, MapperOptions};

tests!(
    same_identity_maps_to_same_object,
    duplicates_in_batch_last_write_wins,
    duplicates_in_batch_first_write_wins,
    first_write_wins_is_per_call,
    batch_preserves_input_order,
    missing_identity_fails,
    null_identity_fails,
    identity_transform_failure_is_structural,
    scalar_references_existing_object,
    referenced_identity_creates_object,
);

fn same_identity_maps_to_same_object(mut s: Setup) {
    let first = assert_ok!(s.map_object(
        "Character",
        json!({
            "id": "1699",
            "name": "Batman",
            "realName": "Bruce Wayne",
            "villain": false,
        })
    ))
    .value;

    let second = assert_ok!(s.map_object(
        "Character",
        json!({ "id": "1699", "name": "The Dark Knight" })
    ))
    .value;

    assert_eq!(first, second);
    assert_eq!(1, s.count("Character"));
    assert_eq!(Value::I64(1699), s.attr(second, "id"));
    assert_eq!(Value::from("The Dark Knight"), s.attr(second, "name"));

    // Fields absent from the second document keep their values
    assert_eq!(Value::from("Bruce Wayne"), s.attr(second, "real_name"));
    assert_eq!(Value::Bool(false), s.attr(second, "villain"));
}

fn duplicates_in_batch_last_write_wins(mut s: Setup) {
    let mapped = assert_ok!(s.map_array(
        "Power",
        json!([{ "id": 1, "name": "A" }, { "id": 1, "name": "B" }])
    ));

    assert_eq!(2, mapped.value.len());
    assert_eq!(mapped.value[0], mapped.value[1]);
    assert_eq!(1, s.count("Power"));
    assert_eq!(Value::from("B"), s.attr(mapped.value[0], "name"));
}

fn duplicates_in_batch_first_write_wins(mut s: Setup) {
    s.set_options(MapperOptions {
        duplicates: DuplicatePolicy::FirstWriteWins,
        ..MapperOptions::default()
    });

    let mapped = assert_ok!(s.map_array(
        "Power",
        json!([{ "id": 1, "name": "A" }, { "id": 1, "name": "B" }])
    ));

    assert_eq!(mapped.value[0], mapped.value[1]);
    assert_eq!(1, s.count("Power"));
    assert_eq!(Value::from("A"), s.attr(mapped.value[0], "name"));
}

fn first_write_wins_is_per_call(mut s: Setup) {
    s.set_options(MapperOptions {
        duplicates: DuplicatePolicy::FirstWriteWins,
        ..MapperOptions::default()
    });

    let power = assert_ok!(s.map_object("Power", json!({ "id": 1, "name": "A" }))).value;
    assert_ok!(s.map_object("Power", json!({ "id": 1, "name": "C" })));

    assert_eq!(Value::from("C"), s.attr(power, "name"));
}

fn batch_preserves_input_order(mut s: Setup) {
    let existing = assert_ok!(s.map_object("Power", json!({ "id": 2, "name": "Flight" }))).value;

    let mapped = assert_ok!(s.map_array(
        "Power",
        json!([
            { "id": 3, "name": "Agility" },
            null,
            { "id": 2 },
            { "id": 1, "name": "Strength" },
        ])
    ));

    assert_eq!(3, mapped.value.len());
    assert_eq!(existing, mapped.value[1]);
    assert_eq!(Some(mapped.value[0]), s.find("Power", 3_i64));
    assert_eq!(Some(mapped.value[2]), s.find("Power", 1_i64));
    assert_eq!(Value::from("Flight"), s.attr(existing, "name"));
}

fn missing_identity_fails(mut s: Setup) {
    let err = assert_err!(s.map_object("Character", json!({ "name": "Nobody" })));

    assert!(err.any(Error::is_missing_identity_value));
    assert_eq!(
        "mapping `Character` element [0]: missing identity value for Character at `id`",
        err.to_string()
    );
    assert_eq!(0, s.count("Character"));
}

fn null_identity_fails(mut s: Setup) {
    let err = assert_err!(s.map_array(
        "Power",
        json!([{ "id": 1 }, { "id": null, "name": "Ghost" }])
    ));

    assert!(err.root().is_missing_identity_value());
    assert_eq!(0, s.count("Power"));
}

fn identity_transform_failure_is_structural(mut s: Setup) {
    // The identity transformer only accepts strings
    let err = assert_err!(s.map_object("Character", json!({ "id": 1699, "name": "Batman" })));

    assert!(err.any(Error::is_attribute_type_mismatch));
    assert!(err.root().is_invalid_transform_input());
    assert_eq!(0, s.count("Character"));
}

fn scalar_references_existing_object(mut s: Setup) {
    let flight = assert_ok!(s.map_object("Power", json!({ "id": 4, "name": "Flight" }))).value;

    let referenced = assert_ok!(s.map_object("Power", json!(4))).value;

    assert_eq!(flight, referenced);
    assert_eq!(Value::from("Flight"), s.attr(flight, "name"));
}

fn referenced_identity_creates_object(mut s: Setup) {
    let character = assert_ok!(s.map_object(
        "Character",
        json!({ "id": "1699", "powers": [4, 5] })
    ))
    .value;

    let powers = s.related(character, "powers");
    assert_eq!(2, powers.len());
    assert_eq!(Value::I64(4), s.attr(powers[0], "id"));
    assert_eq!(Value::Null, s.attr(powers[0], "name"));
    assert_eq!(Some(powers[1]), s.find("Power", 5_i64));
}
