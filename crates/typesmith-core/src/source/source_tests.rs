#![allow(non_snake_case)]

use super::*;
use crate::namer::{ForbiddenWords, NameArena};
use crate::naming::{Legalizer, WordStyle};
use crate::src;

fn sealed_arena_with(proposals: &[&str]) -> (NameArena, Vec<NameId>) {
    let mut arena = NameArena::new();
    let ns = arena.add_namespace(
        "types",
        WordStyle::pascal(),
        Legalizer::ascii(),
        ForbiddenWords::none(),
        true,
    );
    let handles = proposals.iter().map(|p| arena.name(ns, *p)).collect();
    arena.seal();
    (arena, handles)
}

fn empty_arena() -> NameArena {
    let mut arena = NameArena::new();
    arena.seal();
    arena
}

// ============================================================================
// Lines and indentation
// ============================================================================

#[test]
fn Emitter___emit_line___prefixes_current_indentation() {
    let mut out = Emitter::new("  ", "#");
    out.emit_line("module Types");
    out.indent(|out| {
        out.emit_line("Int = Strict::Integer");
        Ok(())
    })
    .unwrap();
    out.emit_line("end");

    let lines = out.finish(&empty_arena()).unwrap();

    assert_eq!(lines, vec!["module Types", "  Int = Strict::Integer", "end"]);
}

#[test]
fn Emitter___emit_block___wraps_indented_body() {
    let mut out = Emitter::new("  ", "#");
    out.emit_block(
        "def to_json(options = nil)",
        |out| {
            out.emit_line("JSON.generate(to_dynamic, options)");
            Ok(())
        },
        "end",
    )
    .unwrap();

    let lines = out.finish(&empty_arena()).unwrap();

    assert_eq!(
        lines,
        vec![
            "def to_json(options = nil)",
            "  JSON.generate(to_dynamic, options)",
            "end",
        ]
    );
}

#[test]
fn Emitter___nested_indent___stacks_units() {
    let mut out = Emitter::new("  ", "#");
    out.indent(|out| {
        out.indent(|out| {
            out.emit_line("deep");
            Ok(())
        })
    })
    .unwrap();

    let lines = out.finish(&empty_arena()).unwrap();

    assert_eq!(lines, vec!["    deep"]);
}

// ============================================================================
// Blank-line handling
// ============================================================================

#[test]
fn Emitter___ensure_blank_line___skips_when_already_blank() {
    let mut out = Emitter::new("  ", "#");
    out.emit_line("a");
    out.ensure_blank_line();
    out.ensure_blank_line();
    out.emit_line("b");

    let lines = out.finish(&empty_arena()).unwrap();

    assert_eq!(lines, vec!["a", "", "b"]);
}

#[test]
fn Emitter___ensure_blank_line___is_noop_at_start() {
    let mut out = Emitter::new("  ", "#");
    out.ensure_blank_line();
    out.emit_line("first");

    let lines = out.finish(&empty_arena()).unwrap();

    assert_eq!(lines, vec!["first"]);
}

// ============================================================================
// Deferred name resolution
// ============================================================================

#[test]
fn Emitter___name_fragments___resolve_at_finish() {
    let (arena, handles) = sealed_arena_with(&["next evolution"]);
    let mut out = Emitter::new("  ", "#");
    out.emit_line(src!["class ", handles[0], " < Dry::Struct"]);

    let lines = out.finish(&arena).unwrap();

    assert_eq!(lines, vec!["class NextEvolution < Dry::Struct"]);
}

#[test]
fn Emitter___unassigned_name___fails_at_finish() {
    let mut arena = NameArena::new();
    let ns = arena.add_namespace(
        "types",
        WordStyle::pascal(),
        Legalizer::ascii(),
        ForbiddenWords::none(),
        true,
    );
    let handle = arena.name(ns, "pokemon");
    // Arena deliberately left unsealed.
    let mut out = Emitter::new("  ", "#");
    out.emit_line(src!["class ", handle]);

    let result = out.finish(&arena);

    assert!(matches!(
        result,
        Err(crate::error::RenderError::UnassignedName { .. })
    ));
}

// ============================================================================
// Tables
// ============================================================================

#[test]
fn Emitter___emit_table___aligns_columns_to_widest_cell() {
    let mut out = Emitter::new("  ", "#");
    out.indent(|out| {
        out.emit_table(vec![
            vec![src!["attribute :id,"], src!["Types::Int"]],
            vec![src!["attribute :next_evolution,"], src!["Types::String"]],
        ]);
        Ok(())
    })
    .unwrap();

    let lines = out.finish(&empty_arena()).unwrap();

    assert_eq!(
        lines,
        vec![
            "  attribute :id,             Types::Int",
            "  attribute :next_evolution, Types::String",
        ]
    );
}

#[test]
fn Emitter___emit_table___resolves_names_before_alignment() {
    let (arena, handles) = sealed_arena_with(&["Egg", "Weakness"]);
    let mut out = Emitter::new("  ", "#");
    out.emit_table(vec![
        vec![src![handles[0]], src!["= \"10 km\""]],
        vec![src![handles[1]], src!["= \"Poison\""]],
    ]);

    let lines = out.finish(&arena).unwrap();

    assert_eq!(lines, vec!["Egg      = \"10 km\"", "Weakness = \"Poison\""]);
}

#[test]
fn Emitter___empty_table___emits_nothing() {
    let mut out = Emitter::new("  ", "#");
    out.emit_table(Vec::new());

    let lines = out.finish(&empty_arena()).unwrap();

    assert!(lines.is_empty());
}

// ============================================================================
// Comments and annotations
// ============================================================================

#[test]
fn Emitter___emit_comment_lines___uses_the_prefix() {
    let mut out = Emitter::new("  ", "#");
    out.emit_comment_lines(&["first".to_string(), String::new(), "second".to_string()]);

    let lines = out.finish(&empty_arena()).unwrap();

    assert_eq!(lines, vec!["# first", "#", "# second"]);
}

#[test]
fn Emitter___annotated_fragment___appends_trailing_comment() {
    let mut out = Emitter::new("  ", "#");
    out.emit_line(src![
        "attribute :extra, ",
        Source::annotated(Annotation::AnyType, "Types::Any")
    ]);

    let lines = out.finish(&empty_arena()).unwrap();

    assert_eq!(
        lines,
        vec!["attribute :extra, Types::Any # unconstrained type"]
    );
}
