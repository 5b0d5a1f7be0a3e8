#![allow(non_snake_case)]

use super::*;
use crate::graph::{optional_property, property, TypeGraphBuilder};
use crate::targets::RubyTarget;

fn render_lines(graph: &TypeGraph) -> Vec<String> {
    render(graph, &RubyTarget::new(), &RenderOptions::default())
        .unwrap()
        .lines
}

fn small_graph() -> TypeGraph {
    let mut builder = TypeGraphBuilder::new();
    let string = builder.add_string();
    let evolution = builder.add_class("Evolution", vec![property("name", string)]);
    let evolutions = builder.add_array(evolution);
    let pokemon = builder.add_class(
        "Pokemon",
        vec![
            property("name", string),
            optional_property("next_evolution", evolutions),
        ],
    );
    builder.add_top_level("Pokemon", pokemon);
    builder.finish().unwrap()
}

// ============================================================================
// Phases
// ============================================================================

#[test]
fn render___body___declares_leaves_before_referrers() {
    let lines = render_lines(&small_graph());

    let evolution = lines
        .iter()
        .position(|l| l == "class Evolution < Dry::Struct")
        .unwrap();
    let pokemon = lines
        .iter()
        .position(|l| l == "class Pokemon < Dry::Struct")
        .unwrap();

    assert!(evolution < pokemon);
}

#[test]
fn render___header___precedes_prelude_and_body() {
    let lines = render_lines(&small_graph());

    let requires = lines.iter().position(|l| l == "require 'json'").unwrap();
    let types_module = lines.iter().position(|l| l == "module Types").unwrap();
    let first_class = lines
        .iter()
        .position(|l| l.starts_with("class "))
        .unwrap();

    assert!(requires < types_module);
    assert!(types_module < first_class);
}

#[test]
fn render___named_types___are_separated_by_blank_lines() {
    let lines = render_lines(&small_graph());

    let pokemon = lines
        .iter()
        .position(|l| l == "class Pokemon < Dry::Struct")
        .unwrap();

    assert_eq!(lines[pokemon - 1], "");
}

#[test]
fn render___blank_line_policy_none___packs_declarations() {
    let graph = small_graph();
    let options = RenderOptions {
        blank_lines: BlankLinePolicy::None,
        ..RenderOptions::default()
    };

    let file = render(&graph, &RubyTarget::new(), &options).unwrap();

    let pokemon = file
        .lines
        .iter()
        .position(|l| l == "class Pokemon < Dry::Struct")
        .unwrap();
    assert_ne!(file.lines[pokemon - 1], "");
}

// ============================================================================
// Top-level naming
// ============================================================================

#[test]
fn render___top_level_of_named_class___reuses_its_name() {
    let lines = render_lines(&small_graph());

    // The class itself is the entry point; no alias module appears.
    assert!(!lines.iter().any(|l| l.starts_with("module Pokemon")));
}

#[test]
fn render___top_level_of_unnamed_type___gets_alias_module() {
    let mut builder = TypeGraphBuilder::new();
    let string = builder.add_string();
    let pokemon = builder.add_class("Pokemon", vec![property("name", string)]);
    let array = builder.add_array(pokemon);
    builder.add_top_level("Pokedex", array);
    let graph = builder.finish().unwrap();

    let lines = render_lines(&graph);

    assert!(lines.iter().any(|l| l == "module Pokedex"));
    assert!(lines
        .iter()
        .any(|l| l.contains("d.map { |x| Pokemon.from_dynamic(x) }")));
}

// ============================================================================
// Output naming
// ============================================================================

#[test]
fn render___file_stem___derives_from_first_top_level() {
    let graph = small_graph();

    let file = render(&graph, &RubyTarget::new(), &RenderOptions::default()).unwrap();

    assert_eq!(file.file_stem, "pokemon");
    assert_eq!(file.extension, "rb");
}

#[test]
fn render___no_top_level___falls_back_to_generated_stem() {
    let mut builder = TypeGraphBuilder::new();
    let string = builder.add_string();
    builder.add_class("Thing", vec![property("name", string)]);
    let graph = builder.finish().unwrap();

    let file = render(&graph, &RubyTarget::new(), &RenderOptions::default()).unwrap();

    assert_eq!(file.file_stem, "generated");
}

// ============================================================================
// Determinism and name properties
// ============================================================================

#[test]
fn render___same_graph___is_byte_identical() {
    let graph = small_graph();

    let first = render(&graph, &RubyTarget::new(), &RenderOptions::default()).unwrap();
    let second = render(&graph, &RubyTarget::new(), &RenderOptions::default()).unwrap();

    assert_eq!(first.text(), second.text());
}

#[test]
fn render___extended_graph___keeps_existing_names() {
    let base = small_graph();
    let base_lines = render_lines(&base);

    let mut builder = TypeGraphBuilder::new();
    let string = builder.add_string();
    let evolution = builder.add_class("Evolution", vec![property("name", string)]);
    let evolutions = builder.add_array(evolution);
    let pokemon = builder.add_class(
        "Pokemon",
        vec![
            property("name", string),
            optional_property("next_evolution", evolutions),
        ],
    );
    builder.add_top_level("Pokemon", pokemon);
    // Extension: one more class after everything else.
    builder.add_class("Trainer", vec![property("name", string)]);
    let extended = builder.finish().unwrap();

    let extended_lines = render_lines(&extended);

    for line in &base_lines {
        if line.starts_with("class ") {
            assert!(
                extended_lines.contains(line),
                "extension must not rename '{line}'"
            );
        }
    }
}
