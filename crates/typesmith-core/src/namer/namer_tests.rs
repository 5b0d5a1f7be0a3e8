#![allow(non_snake_case)]

use super::*;
use crate::naming::{Legalizer, WordStyle};

fn pascal_namespace(arena: &mut NameArena, forbidden: ForbiddenWords) -> NamespaceId {
    arena.add_namespace("types", WordStyle::pascal(), Legalizer::ascii(), forbidden, true)
}

fn snake_namespace(arena: &mut NameArena, forbidden: ForbiddenWords) -> NamespaceId {
    arena.add_namespace(
        "properties",
        WordStyle::snake(),
        Legalizer::ascii(),
        forbidden,
        false,
    )
}

// ============================================================================
// Assignment
// ============================================================================

#[test]
fn NameArena___unique_proposals___assign_styled_names() {
    let mut arena = NameArena::new();
    let ns = pascal_namespace(&mut arena, ForbiddenWords::none());
    let pokemon = arena.name(ns, "pokemon");
    let evolution = arena.name(ns, "next evolution");

    arena.seal();

    assert_eq!(arena.resolved(pokemon).unwrap(), "Pokemon");
    assert_eq!(arena.resolved(evolution).unwrap(), "NextEvolution");
}

#[test]
fn NameArena___colliding_proposals___suffix_the_later_one() {
    let mut arena = NameArena::new();
    let ns = pascal_namespace(&mut arena, ForbiddenWords::none());
    let first = arena.name(ns, "thing");
    let second = arena.name(ns, "Thing");
    let third = arena.name(ns, "thing!");

    arena.seal();

    assert_eq!(arena.resolved(first).unwrap(), "Thing");
    assert_eq!(arena.resolved(second).unwrap(), "Thing_2");
    assert_eq!(arena.resolved(third).unwrap(), "Thing_3");
}

#[test]
fn NameArena___forbidden_word___is_suffixed() {
    let mut arena = NameArena::new();
    let ns = snake_namespace(&mut arena, ForbiddenWords::reserved(&["class"], false));
    let class_property = arena.name(ns, "class");

    arena.seal();

    assert_eq!(arena.resolved(class_property).unwrap(), "class_2");
}

#[test]
fn NameArena___alias___is_tried_before_numeric_suffix() {
    let mut arena = NameArena::new();
    let ns = pascal_namespace(&mut arena, ForbiddenWords::none());
    let first = arena.name(ns, "value");
    let second = arena.name_with_aliases(ns, "value", vec!["fallback value".to_string()]);

    arena.seal();

    assert_eq!(arena.resolved(first).unwrap(), "Value");
    assert_eq!(arena.resolved(second).unwrap(), "FallbackValue");
}

#[test]
fn NameArena___include_global___avoids_type_namespace_names() {
    let mut arena = NameArena::new();
    let types = pascal_namespace(&mut arena, ForbiddenWords::none());
    let members = arena.add_namespace(
        "members",
        WordStyle::pascal(),
        Legalizer::ascii(),
        ForbiddenWords {
            names: Vec::new(),
            include_global: true,
        },
        false,
    );
    let class_name = arena.name(types, "Pokemon");
    let member = arena.name(members, "Pokemon");

    arena.seal();

    assert_eq!(arena.resolved(class_name).unwrap(), "Pokemon");
    assert_eq!(arena.resolved(member).unwrap(), "Pokemon_2");
}

#[test]
fn NameArena___separate_namespaces___may_share_names() {
    let mut arena = NameArena::new();
    let first = snake_namespace(&mut arena, ForbiddenWords::none());
    let second = snake_namespace(&mut arena, ForbiddenWords::none());
    let a = arena.name(first, "name");
    let b = arena.name(second, "name");

    arena.seal();

    assert_eq!(arena.resolved(a).unwrap(), "name");
    assert_eq!(arena.resolved(b).unwrap(), "name");
}

// ============================================================================
// Sealing
// ============================================================================

#[test]
fn NameArena___resolve_before_seal___is_unassigned_error() {
    let mut arena = NameArena::new();
    let ns = pascal_namespace(&mut arena, ForbiddenWords::none());
    let handle = arena.name(ns, "pokemon");

    let result = arena.resolved(handle);

    assert!(matches!(
        result,
        Err(crate::error::RenderError::UnassignedName { .. })
    ));
}

#[test]
fn NameArena___seal___is_observable() {
    let mut arena = NameArena::new();
    pascal_namespace(&mut arena, ForbiddenWords::none());

    assert!(!arena.is_sealed());
    arena.seal();
    assert!(arena.is_sealed());
}

#[test]
#[should_panic(expected = "name allocated after seal")]
fn NameArena___allocation_after_seal___panics() {
    let mut arena = NameArena::new();
    let ns = pascal_namespace(&mut arena, ForbiddenWords::none());
    arena.seal();

    arena.name(ns, "late");
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn NameArena___same_inputs___assign_identically() {
    let build = || {
        let mut arena = NameArena::new();
        let ns = pascal_namespace(&mut arena, ForbiddenWords::none());
        let handles: Vec<NameId> = ["10 km", "2 km", "Not in Eggs", "10-km", "2_km"]
            .iter()
            .map(|raw| arena.name(ns, *raw))
            .collect();
        arena.seal();
        handles
            .into_iter()
            .map(|h| arena.resolved(h).unwrap().to_string())
            .collect::<Vec<_>>()
    };

    let first = build();
    let second = build();

    assert_eq!(first, second);
    let unique: std::collections::HashSet<&String> = first.iter().collect();
    assert_eq!(unique.len(), first.len(), "assigned names must be distinct");
}
