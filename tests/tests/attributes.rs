use tests::*;
use tests::assert_eq;

use sapling::{Error, MapperOptions};

tests!(
    malformed_attribute_is_reported,
    strict_attributes_abort,
    null_clears_attribute,
    null_for_required_attribute_is_mismatch,
    absent_field_leaves_value,
    dotted_key_path,
    coercions,
    unmapped_attribute_is_ignored,
    transformer_applies_before_coercion,
);

fn malformed_attribute_is_reported(mut s: Setup) {
    let mapped = assert_ok!(s.map_object(
        "Character",
        json!({
            "id": "1699",
            "name": "Batman",
            "height": "tall",
            "realName": "Bruce Wayne",
        })
    ));

    assert!(!mapped.is_clean());
    assert_eq!(1, mapped.issues.len());
    assert!(mapped.issues[0].is_attribute_type_mismatch());
    assert_eq!(
        r#"attribute type mismatch: Character.height expects Float, found String("tall")"#,
        mapped.issues[0].to_string()
    );

    // Siblings still map
    let batman = mapped.value;
    assert_eq!(Value::from("Batman"), s.attr(batman, "name"));
    assert_eq!(Value::from("Bruce Wayne"), s.attr(batman, "real_name"));
    assert_eq!(Value::Null, s.attr(batman, "height"));
}

fn strict_attributes_abort(mut s: Setup) {
    s.set_options(MapperOptions {
        strict_attributes: true,
        ..MapperOptions::default()
    });

    let err = assert_err!(s.map_object(
        "Character",
        json!({ "id": "1699", "height": "tall" })
    ));

    assert!(err.any(Error::is_attribute_type_mismatch));
    assert_eq!(0, s.count("Character"));
}

fn null_clears_attribute(mut s: Setup) {
    let batman = assert_ok!(s.map_object(
        "Character",
        json!({ "id": "1699", "realName": "Bruce Wayne" })
    ))
    .value;

    assert_ok!(s.map_object("Character", json!({ "id": "1699", "realName": null })));

    assert_eq!(Value::Null, s.attr(batman, "real_name"));
}

fn null_for_required_attribute_is_mismatch(mut s: Setup) {
    let mapped = assert_ok!(s.map_object(
        "Character",
        json!({ "id": "1699", "villain": true })
    ));
    let batman = mapped.value;
    assert!(mapped.is_clean());

    let mapped = assert_ok!(s.map_object("Character", json!({ "id": "1699", "villain": null })));

    assert!(mapped.issues[0].is_attribute_type_mismatch());
    assert_eq!(Value::Bool(true), s.attr(batman, "villain"));
}

fn absent_field_leaves_value(mut s: Setup) {
    let batman = assert_ok!(s.map_object(
        "Character",
        json!({ "id": "1699", "name": "Batman", "height": 1.88 })
    ))
    .value;

    assert_ok!(s.map_object("Character", json!({ "id": "1699", "realName": "Bruce Wayne" })));

    assert_eq!(Value::from("Batman"), s.attr(batman, "name"));
    assert_eq!(Value::F64(1.88), s.attr(batman, "height"));
}

fn dotted_key_path(mut s: Setup) {
    let batman = assert_ok!(s.map_object(
        "Character",
        json!({ "id": "1699", "details": { "alias": "Matches Malone" } })
    ))
    .value;
    assert_eq!(Value::from("Matches Malone"), s.attr(batman, "alias"));

    // An intermediate value that is not an object counts as absent
    let mapped = assert_ok!(s.map_object(
        "Character",
        json!({ "id": "1699", "details": "classified" })
    ));
    assert!(mapped.is_clean());
    assert_eq!(Value::from("Matches Malone"), s.attr(batman, "alias"));
}

fn coercions(mut s: Setup) {
    let batman = assert_ok!(s.map_object(
        "Character",
        json!({ "id": "1699", "height": 2, "villain": 0 })
    ))
    .value;
    assert_eq!(Value::F64(2.0), s.attr(batman, "height"));
    assert_eq!(Value::Bool(false), s.attr(batman, "villain"));

    let power = assert_ok!(s.map_object("Power", json!({ "id": 7.0 }))).value;
    assert_eq!(Value::I64(7), s.attr(power, "id"));

    let profile = assert_ok!(s.map_object(
        "Profile",
        json!({ "id": "67e55044-10b1-426f-9247-bb680e5fe0c8" })
    ))
    .value;
    assert!(s.attr(profile, "id").as_uuid().is_some());

    let mapped = assert_ok!(s.map_object("Power", json!({ "id": 8, "name": 12 })));
    assert!(mapped.issues[0].is_attribute_type_mismatch());
}

fn unmapped_attribute_is_ignored(mut s: Setup) {
    let batman = assert_ok!(s.map_object(
        "Character",
        json!({ "id": "1699", "notes": "not mapped" })
    ))
    .value;

    assert_eq!(Value::Null, s.attr(batman, "notes"));
}

fn transformer_applies_before_coercion(mut s: Setup) {
    let dc = assert_ok!(s.map_object("Publisher", json!({ "id": "dc", "name": "DC Comics" }))).value;

    assert_eq!(Value::from("DC COMICS"), s.attr(dc, "name"));
}
