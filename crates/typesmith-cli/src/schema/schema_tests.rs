#![allow(non_snake_case)]

use super::*;

const MINIMAL: &str = r#"{
    "types": [
        { "kind": "string" },
        { "kind": "class", "name": "Evolution", "properties": [
            { "name": "name", "type": 0 }
        ] },
        { "kind": "array", "items": 1 },
        { "kind": "class", "name": "Pokemon", "properties": [
            { "name": "name", "type": 0, "optional": false, "description": null },
            { "name": "next_evolution", "type": 2, "optional": true }
        ] }
    ],
    "topLevels": [ { "name": "TopLevel", "type": 3 } ]
}"#;

#[test]
fn parse_document___minimal_schema___builds_the_graph() {
    let graph = parse_document(MINIMAL).unwrap();

    assert_eq!(graph.len(), 4);
    assert_eq!(graph.top_levels().len(), 1);
    assert_eq!(graph.top_levels()[0].name, "TopLevel");
    assert_eq!(graph.named_types().len(), 2);
}

#[test]
fn parse_document___optional_flag___defaults_to_required() {
    let graph = parse_document(MINIMAL).unwrap();

    let pokemon = graph.named_types()[1];
    let typesmith_core::TypeKind::Class { properties, .. } = graph.kind(pokemon) else {
        panic!("expected a class");
    };

    assert!(!properties[0].optional);
    assert!(properties[1].optional);
}

#[test]
fn parse_document___enum_and_union_declarations___are_supported() {
    let source = r#"{
        "types": [
            { "kind": "null" },
            { "kind": "enum", "name": "Egg", "cases": ["2 km", "5 km"] },
            { "kind": "union", "name": "MaybeEgg", "members": [1, 0] }
        ],
        "topLevels": []
    }"#;

    let graph = parse_document(source).unwrap();

    let union = graph.named_types()[1];
    assert!(graph.nullable_member(union).is_some());
}

#[test]
fn parse_document___descriptions___are_attached() {
    let source = r#"{
        "types": [
            { "kind": "string" },
            { "kind": "class", "name": "Card", "description": ["A card."], "properties": [
                { "name": "label", "type": 0, "description": ["Display label."] }
            ] }
        ]
    }"#;

    let graph = parse_document(source).unwrap();

    let card = graph.named_types()[0];
    assert_eq!(graph.node(card).description, vec!["A card."]);
}

// ============================================================================
// Rejection paths
// ============================================================================

#[test]
fn parse_document___dangling_reference___is_rejected() {
    let source = r#"{ "types": [ { "kind": "array", "items": 7 } ] }"#;

    let result = parse_document(source);

    assert!(result.is_err());
}

#[test]
fn parse_document___duplicate_enum_cases___are_rejected() {
    let source = r#"{
        "types": [ { "kind": "enum", "name": "Egg", "cases": ["2 km", "2 km"] } ]
    }"#;

    let result = parse_document(source);

    assert!(result.is_err());
}

#[test]
fn parse_document___unknown_property_field___is_rejected() {
    let source = r#"{
        "types": [
            { "kind": "string" },
            { "kind": "class", "name": "Card", "properties": [
                { "name": "label", "type": 0, "surprise": true }
            ] }
        ]
    }"#;

    let result = parse_document(source);

    assert!(result.is_err());
}

#[test]
fn parse_document___unknown_kind___is_rejected() {
    let source = r#"{ "types": [ { "kind": "tuple" } ] }"#;

    let result = parse_document(source);

    assert!(result.is_err());
}

#[test]
fn parse_document___malformed_json___is_rejected() {
    let result = parse_document("{ not json");

    assert!(result.is_err());
}
