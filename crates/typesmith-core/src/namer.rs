//! Collision-free identifier assignment.
//!
//! A [`NameArena`] owns every name handle created during a render. Each
//! handle belongs to exactly one namespace (the global type namespace,
//! a class's property namespace, an enum's case namespace, a union's
//! member namespace). Handles are created while the arena is open,
//! assigned concrete strings exactly once when the arena seals, and
//! resolved any number of times afterwards.
//!
//! Assignment is deterministic: handles are processed in allocation
//! order (which follows graph order), and when two handles in one
//! namespace would collide, the later one receives a numeric suffix
//! (`_2`, `_3`, …) applied after styling and before legalization.

use std::collections::HashSet;

use crate::error::{RenderError, RenderResult};
use crate::naming::{Legalizer, WordStyle};

/// Index of a name handle in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NameId(usize);

/// Index of a namespace in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NamespaceId(usize);

/// Forbidden-word configuration for one namespace.
#[derive(Debug, Clone)]
pub struct ForbiddenWords {
    /// Fixed strings (typically the target's reserved words).
    pub names: Vec<String>,
    /// Whether names assigned in the global type namespace are also
    /// forbidden here.
    pub include_global: bool,
}

impl ForbiddenWords {
    pub fn none() -> ForbiddenWords {
        ForbiddenWords {
            names: Vec::new(),
            include_global: false,
        }
    }

    pub fn reserved(words: &[&str], include_global: bool) -> ForbiddenWords {
        ForbiddenWords {
            names: words.iter().map(|w| w.to_string()).collect(),
            include_global,
        }
    }
}

#[derive(Debug)]
struct Namespace {
    label: String,
    style: WordStyle,
    legal: Legalizer,
    forbidden: HashSet<String>,
    include_global: bool,
    /// Handles in allocation order.
    members: Vec<NameId>,
}

#[derive(Debug)]
struct NameRecord {
    namespace: NamespaceId,
    proposed: String,
    /// Fallback spellings tried before numeric suffixes.
    aliases: Vec<String>,
    assigned: Option<String>,
}

/// Monotonic state of the arena: open for allocation, then sealed
/// read-only once every assignment is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArenaState {
    Open,
    Sealed,
}

/// Arena of name handles and their namespaces.
#[derive(Debug)]
pub struct NameArena {
    namespaces: Vec<Namespace>,
    names: Vec<NameRecord>,
    /// The namespace whose assignments feed `include_global` consumers.
    global: Option<NamespaceId>,
    state: ArenaState,
}

impl Default for NameArena {
    fn default() -> Self {
        Self::new()
    }
}

impl NameArena {
    pub fn new() -> NameArena {
        NameArena {
            namespaces: Vec::new(),
            names: Vec::new(),
            global: None,
            state: ArenaState::Open,
        }
    }

    /// Create a namespace. The first namespace created with
    /// `is_global` set becomes the global type namespace.
    pub fn add_namespace(
        &mut self,
        label: impl Into<String>,
        style: WordStyle,
        legal: Legalizer,
        forbidden: ForbiddenWords,
        is_global: bool,
    ) -> NamespaceId {
        assert!(self.state == ArenaState::Open, "namespace added after seal");
        let id = NamespaceId(self.namespaces.len());
        self.namespaces.push(Namespace {
            label: label.into(),
            style,
            legal,
            forbidden: forbidden.names.into_iter().collect(),
            include_global: forbidden.include_global,
            members: Vec::new(),
        });
        if is_global && self.global.is_none() {
            self.global = Some(id);
        }
        id
    }

    /// Allocate a name handle with a proposed raw name.
    pub fn name(&mut self, namespace: NamespaceId, proposed: impl Into<String>) -> NameId {
        self.name_with_aliases(namespace, proposed, Vec::new())
    }

    /// Allocate a name handle with fallback spellings tried before
    /// numeric disambiguation.
    pub fn name_with_aliases(
        &mut self,
        namespace: NamespaceId,
        proposed: impl Into<String>,
        aliases: Vec<String>,
    ) -> NameId {
        assert!(self.state == ArenaState::Open, "name allocated after seal");
        let id = NameId(self.names.len());
        self.names.push(NameRecord {
            namespace,
            proposed: proposed.into(),
            aliases,
            assigned: None,
        });
        self.namespaces[namespace.0].members.push(id);
        id
    }

    /// Assign a concrete string to every handle and seal the arena.
    ///
    /// Namespaces are processed in creation order, so the global type
    /// namespace (created first) is fully assigned before any
    /// namespace that forbids its names.
    pub fn seal(&mut self) {
        assert!(self.state == ArenaState::Open, "arena sealed twice");

        let mut global_assigned: HashSet<String> = HashSet::new();
        for ns_index in 0..self.namespaces.len() {
            let mut taken: HashSet<String> = HashSet::new();
            let include_global = self.namespaces[ns_index].include_global;
            let members = self.namespaces[ns_index].members.clone();
            for name_id in members {
                let ns = &self.namespaces[ns_index];
                let record = &self.names[name_id.0];
                let assigned = Self::pick(ns, record, &taken, if include_global {
                    Some(&global_assigned)
                } else {
                    None
                });
                taken.insert(assigned.clone());
                if self.global == Some(NamespaceId(ns_index)) {
                    global_assigned.insert(assigned.clone());
                }
                self.names[name_id.0].assigned = Some(assigned);
            }
        }
        self.state = ArenaState::Sealed;
        tracing::debug!(names = self.names.len(), "name arena sealed");
    }

    fn pick(
        ns: &Namespace,
        record: &NameRecord,
        taken: &HashSet<String>,
        global: Option<&HashSet<String>>,
    ) -> String {
        let free = |candidate: &str| {
            !taken.contains(candidate)
                && !ns.forbidden.contains(candidate)
                && global.map_or(true, |g| !g.contains(candidate))
        };

        let spellings: Vec<&str> = std::iter::once(record.proposed.as_str())
            .chain(record.aliases.iter().map(String::as_str))
            .collect();

        for spelling in &spellings {
            let candidate = ns.style.name_from(spelling, &ns.legal);
            if free(&candidate) {
                return candidate;
            }
        }

        // Numeric suffix goes after styling, before legalization.
        let styled = ns.style.apply(&crate::naming::split_into_words(&record.proposed));
        for n in 2.. {
            let candidate = ns
                .legal
                .legalize(&format!("{styled}_{n}"), ns.style.is_upper());
            if free(&candidate) {
                return candidate;
            }
        }
        unreachable!("numeric suffixes are unbounded")
    }

    /// Resolve a handle to its assigned string.
    pub fn resolved(&self, id: NameId) -> RenderResult<&str> {
        let record = &self.names[id.0];
        record
            .assigned
            .as_deref()
            .ok_or_else(|| RenderError::UnassignedName {
                namespace: self.namespaces[record.namespace.0].label.clone(),
                proposed: record.proposed.clone(),
            })
    }

    pub fn is_sealed(&self) -> bool {
        self.state == ArenaState::Sealed
    }
}

#[cfg(test)]
#[path = "namer/namer_tests.rs"]
mod namer_tests;
