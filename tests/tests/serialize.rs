use tests::*;
use tests::assert_eq;

use sapling::{
    schema::{AttributeDef, AttributeType, Builder, RelationshipDef},
    Mapper, Schema, Serializer,
};
use sapling_store_memory::MemoryStore;
use serde_json::Value as Json;
use std::sync::Arc;

tests!(
    writes_key_paths,
    uses_reverse_transformers,
    breaks_inverse_cycles,
    by_identity_relationships,
    array_serialization,
);

fn writes_key_paths(mut s: Setup) {
    let batman = assert_ok!(s.map_object(
        "Character",
        json!({
            "id": "1699",
            "name": "Batman",
            "realName": "Bruce Wayne",
            "details": { "alias": "Matches Malone" },
            "height": 1.88,
            "villain": false,
            "notes": "ignored",
        })
    ))
    .value;

    let json = assert_ok!(s.serializer().to_json(&s.store, batman));

    assert_eq!(
        json!({
            "id": "1699",
            "name": "Batman",
            "realName": "Bruce Wayne",
            "details": { "alias": "Matches Malone" },
            "height": 1.88,
            "villain": false,
            "publisher": null,
            "powers": [],
            "allies": [],
            "profile": null,
        }),
        json
    );
}

fn uses_reverse_transformers(mut s: Setup) {
    let dc = assert_ok!(s.map_object("Publisher", json!({ "id": "dc", "name": "DC Comics" }))).value;

    let json = assert_ok!(s.serializer().to_json(&s.store, dc));

    // `Uppercase` has no inverse, so the stored value is written
    assert_eq!(json!({ "id": "dc", "name": "DC COMICS", "characters": [] }), json);
}

fn breaks_inverse_cycles(mut s: Setup) {
    let batman = assert_ok!(s.map_object(
        "Character",
        json!({
            "id": "1699",
            "publisher": { "id": "dc", "name": "dc" },
        })
    ))
    .value;
    let dc = s.find("Publisher", "dc").unwrap();

    let json = assert_ok!(s.serializer().to_json(&s.store, batman));
    assert_eq!(
        json!({ "id": "dc", "name": "DC" }),
        json["publisher"]
    );

    let json = assert_ok!(s.serializer().to_json(&s.store, dc));
    assert_eq!(json!("1699"), json["characters"][0]["id"]);
    assert!(json["characters"][0].get("publisher").is_none());
}

fn by_identity_relationships(mut s: Setup) {
    let batman = assert_ok!(s.map_object(
        "Character",
        json!({ "id": "1699", "allies": ["1", "2"] })
    ))
    .value;

    let json = assert_ok!(s.serializer().to_json(&s.store, batman));

    let mut allies: Vec<_> = json["allies"].as_array().unwrap().clone();
    allies.sort_by_key(|ally| ally.as_str().unwrap().to_string());
    assert_eq!(vec![json!("1"), json!("2")], allies);
}

fn array_serialization(mut s: Setup) {
    let powers = assert_ok!(s.map_array(
        "Power",
        json!([{ "id": 2, "name": "Flight" }, { "id": 1, "name": "Strength" }])
    ))
    .value;

    let json = assert_ok!(s.serializer().to_json_array(&s.store, &powers));

    assert_eq!(
        json!([{ "id": 2, "name": "Flight" }, { "id": 1, "name": "Strength" }]),
        json
    );
}

fn map_and_serialize(builder: &Builder, entity: &str, json: Json) -> Json {
    init_logging();

    let schema = Arc::new(builder.build().unwrap());
    let mapper = Mapper::builder(schema.clone()).build().unwrap();
    let mut store = MemoryStore::new(schema.clone());
    let entity = schema.entity_by_name(entity).unwrap().id;

    let object = assert_ok!(mapper.map_object(&mut store, &json, entity)).value;

    let serializer = Serializer::new(schema, mapper.registry().clone());
    assert_ok!(serializer.to_json(&store, object))
}

#[test]
fn cycles_without_inverse_end_at_identity() {
    let mut builder = Schema::builder();
    builder
        .entity("Character")
        .identity("id")
        .attribute(AttributeDef::new("id", AttributeType::Integer))
        .relationship(RelationshipDef::to_many("allies", "Character"));

    let json = map_and_serialize(
        &builder,
        "Character",
        json!({ "id": 1, "allies": [{ "id": 2, "allies": [1, 2] }] }),
    );

    assert_eq!(
        json!({ "id": 1, "allies": [{ "id": 2, "allies": [1, 2] }] }),
        json
    );
}

#[test]
fn inverse_skipped_only_below_its_relationship() {
    let mut builder = Schema::builder();
    builder
        .entity("Team")
        .identity("id")
        .attribute(AttributeDef::new("id", AttributeType::Integer))
        .relationship(RelationshipDef::to_many("members", "Member").inverse("team"));
    builder
        .entity("Member")
        .identity("id")
        .attribute(AttributeDef::new("id", AttributeType::Integer))
        .relationship(RelationshipDef::to_one("team", "Team").inverse("members"));
    builder
        .entity("Match")
        .identity("id")
        .attribute(AttributeDef::new("id", AttributeType::Integer))
        .relationship(RelationshipDef::to_one("home", "Team"))
        .relationship(RelationshipDef::to_one("star", "Member"));

    let json = map_and_serialize(
        &builder,
        "Match",
        json!({ "id": 1, "home": { "id": 7, "members": [{ "id": 3 }] }, "star": 3 }),
    );

    // `home.members` is finished by the time `star` is written
    assert_eq!(
        json!({
            "id": 1,
            "home": { "id": 7, "members": [{ "id": 3 }] },
            "star": { "id": 3, "team": { "id": 7 } },
        }),
        json
    );
}
