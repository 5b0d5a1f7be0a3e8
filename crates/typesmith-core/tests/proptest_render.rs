//! Property-based tests for naming and rendering
//!
//! Checks the universal renderer invariants: determinism, per-namespace
//! name uniqueness, stability under graph extension, and keyword
//! avoidance, over arbitrary raw labels.

use proptest::prelude::*;
use typesmith_core::graph::{property, TypeGraphBuilder};
use typesmith_core::naming::{Legalizer, WordStyle};
use typesmith_core::{render, ForbiddenWords, NameArena, RenderOptions, RubyTarget};

// Strategy: raw labels as they appear in JSON samples, including
// spaces, punctuation, digits, and empty strings.
fn arb_label() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z][a-z0-9_]{0,12}",
        "[A-Z][a-zA-Z0-9]{0,12}",
        "[a-z0-9 .\\-]{0,16}",
        Just(String::new()),
    ]
}

fn arb_labels() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_label(), 1..12)
}

const RUBY_RESERVED: &[&str] = &[
    "class", "def", "end", "module", "nil", "self", "true", "false",
];

fn assign_all(labels: &[String], forbidden: &[&str]) -> Vec<String> {
    let mut arena = NameArena::new();
    let ns = arena.add_namespace(
        "test",
        WordStyle::snake(),
        Legalizer::ascii(),
        ForbiddenWords::reserved(forbidden, false),
        true,
    );
    let handles: Vec<_> = labels.iter().map(|l| arena.name(ns, l.as_str())).collect();
    arena.seal();
    handles
        .into_iter()
        .map(|h| arena.resolved(h).unwrap().to_string())
        .collect()
}

proptest! {
    /// Property: assignment is deterministic for identical inputs.
    #[test]
    fn proptest_assignment_is_deterministic(labels in arb_labels()) {
        let first = assign_all(&labels, RUBY_RESERVED);
        let second = assign_all(&labels, RUBY_RESERVED);

        prop_assert_eq!(first, second);
    }

    /// Property: assigned names within a namespace are distinct.
    #[test]
    fn proptest_assigned_names_are_unique(labels in arb_labels()) {
        let assigned = assign_all(&labels, RUBY_RESERVED);

        let unique: std::collections::HashSet<&String> = assigned.iter().collect();
        prop_assert_eq!(unique.len(), assigned.len());
    }

    /// Property: no assigned name collides with a forbidden word.
    #[test]
    fn proptest_assigned_names_avoid_keywords(labels in arb_labels()) {
        let assigned = assign_all(&labels, RUBY_RESERVED);

        for name in &assigned {
            prop_assert!(!RUBY_RESERVED.contains(&name.as_str()));
        }
    }

    /// Property: extending the input does not change earlier names.
    #[test]
    fn proptest_assignment_is_stable_under_extension(
        labels in arb_labels(),
        extra in arb_label()
    ) {
        let base = assign_all(&labels, RUBY_RESERVED);

        let mut extended_labels = labels.clone();
        extended_labels.push(extra);
        let extended = assign_all(&extended_labels, RUBY_RESERVED);

        prop_assert_eq!(&extended[..base.len()], &base[..]);
    }

    /// Property: rendering the same graph twice is byte-identical.
    #[test]
    fn proptest_render_is_deterministic(labels in arb_labels()) {
        let build = || {
            let mut builder = TypeGraphBuilder::new();
            let string = builder.add_string();
            let properties = labels
                .iter()
                .enumerate()
                // JSON keys must be unique within the class; raw
                // labels may repeat.
                .map(|(i, l)| property(format!("{l}_{i}"), string))
                .collect();
            let class = builder.add_class("Record", properties);
            builder.add_top_level("Record", class);
            builder.finish().unwrap()
        };

        let first = render(&build(), &RubyTarget::new(), &RenderOptions::default()).unwrap();
        let second = render(&build(), &RubyTarget::new(), &RenderOptions::default()).unwrap();

        prop_assert_eq!(first.text(), second.text());
    }
}
