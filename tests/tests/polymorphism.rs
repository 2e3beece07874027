use tests::*;
use tests::assert_eq;

use sapling::Error;

tests!(
    resolves_concrete_entity,
    batch_mixes_concrete_entities,
    unknown_discriminator_value_fails,
    missing_discriminator_fails,
    numeric_discriminator,
    abstract_to_one,
    scalar_for_abstract_entity_fails,
    entity_mapper_resolves_entity,
    entity_mapper_unknown_name_fails,
    dictionary_transformer_rewrites_keys,
);

fn resolves_concrete_entity(mut s: Setup) {
    let object = assert_ok!(s.map_object(
        "Abstract",
        json!({ "id": 1, "type": "A", "foo": "shared", "bar": "only A" })
    ))
    .value;

    assert_eq!("ConcreteA", s.entity_name(object));
    assert_eq!(Value::from("shared"), s.attr(object, "foo"));
    assert_eq!(Value::from("only A"), s.attr(object, "bar"));
}

fn batch_mixes_concrete_entities(mut s: Setup) {
    let container = assert_ok!(s.map_object(
        "Container",
        json!({
            "id": 100,
            "items": [
                { "id": 1, "type": "A", "bar": "first" },
                { "id": 2, "type": "B", "baz": "second" },
                { "id": 3, "type": "A", "bar": "third" },
            ],
        })
    ))
    .value;

    let items = s.related(container, "items");
    assert_eq!(
        vec!["ConcreteA", "ConcreteB", "ConcreteA"],
        items.iter().map(|item| s.entity_name(*item)).collect::<Vec<_>>()
    );
    assert_eq!(Value::from("second"), s.attr(items[1], "baz"));
    assert_eq!(3, s.count("Abstract"));
    assert_eq!(2, s.count("ConcreteA"));
}

fn unknown_discriminator_value_fails(mut s: Setup) {
    let err = assert_err!(s.map_object(
        "Abstract",
        json!({ "id": 1, "type": "C", "foo": "otherwise valid" })
    ));

    assert!(err.any(Error::is_unknown_discriminator_value));
    assert_eq!(
        "mapping `Abstract` element [0]: unknown discriminator value for Abstract: `C`",
        err.to_string()
    );
    assert_eq!(0, s.count("Abstract"));
}

fn missing_discriminator_fails(mut s: Setup) {
    let err = assert_err!(s.map_array(
        "Abstract",
        json!([{ "id": 1, "type": "A" }, { "id": 2, "foo": "untyped" }])
    ));

    assert!(err.root().is_unknown_discriminator_value());
    assert_eq!(0, s.count("Abstract"));
}

fn numeric_discriminator(mut s: Setup) {
    let object = assert_ok!(s.map_object("Abstract", json!({ "id": 1, "type": 0 }))).value;

    assert_eq!("ConcreteA", s.entity_name(object));
}

fn abstract_to_one(mut s: Setup) {
    let container = assert_ok!(s.map_object(
        "Container",
        json!({ "id": 100, "single": { "id": 5, "type": "B", "baz": "solo" } })
    ))
    .value;

    let single = s.related(container, "single");
    assert_eq!("ConcreteB", s.entity_name(single[0]));

    // The nested payload fails the whole call
    let err = assert_err!(s.map_object(
        "Container",
        json!({ "id": 101, "single": { "id": 6, "type": "Z" } })
    ));
    assert!(err.any(Error::is_unknown_discriminator_value));
    assert_eq!(None, s.find("Container", 101_i64));
}

fn scalar_for_abstract_entity_fails(mut s: Setup) {
    let err = assert_err!(s.map_object("Container", json!({ "id": 100, "items": [1] })));

    assert!(err.root().is_unknown_discriminator_value());
}

fn entity_mapper_resolves_entity(mut s: Setup) {
    let creatures = assert_ok!(s.map_array(
        "Creature",
        json!([
            { "name": "Smaug", "wingspan": 40.5 },
            { "name": "Jormungandr", "length": 1000 },
            { "name": "Fafnir", "kind": "Dragon" },
        ])
    ))
    .value;

    assert_eq!(
        vec!["Dragon", "Serpent", "Dragon"],
        creatures.iter().map(|c| s.entity_name(*c)).collect::<Vec<_>>()
    );
    assert_eq!(Value::F64(1000.0), s.attr(creatures[1], "length"));
    assert_eq!(Some(creatures[0]), s.find("Dragon", "Smaug"));
}

fn entity_mapper_unknown_name_fails(mut s: Setup) {
    let err = assert_err!(s.map_object("Creature", json!({ "name": "Nessie" })));
    assert!(err.root().is_unknown_discriminator_value());

    // Names outside the hierarchy are rejected too
    let err = assert_err!(s.map_object(
        "Creature",
        json!({ "name": "Krypto", "kind": "Character" })
    ));
    assert!(err.root().is_unknown_discriminator_value());
}

fn dictionary_transformer_rewrites_keys(mut s: Setup) {
    let dc = assert_ok!(s.map_object(
        "Publisher",
        json!({ "publisher_id": "dc", "name": "DC Comics" })
    ))
    .value;

    assert_eq!(Some(dc), s.find("Publisher", "dc"));
    assert_eq!(Value::from("DC COMICS"), s.attr(dc, "name"));
}
