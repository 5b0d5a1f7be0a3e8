//! Intermediate representation for schema types.
//!
//! This module defines the type graph consumed by all renderers: an
//! arena of type nodes addressed by index, plus the set of top-level
//! entry points. The graph is immutable once built; every renderer
//! invocation walks the same arena.
//!
//! Named types (classes, enums, unions) carry a proposed identifier
//! that the naming pipeline turns into a collision-free target-language
//! name. Structural types (arrays, maps, primitives) are anonymous.

use crate::error::{RenderError, RenderResult};

/// Index of a type node in the graph arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(usize);

impl TypeId {
    /// Create a type reference from a raw arena index.
    ///
    /// Out-of-range indices are rejected when the graph is built.
    pub fn new(index: usize) -> Self {
        TypeId(index)
    }

    /// The raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A property of a class type.
#[derive(Debug, Clone)]
pub struct ClassProperty {
    /// The original JSON object key. Preserved unstyled; the
    /// serializer contract maps this key exactly.
    pub json_name: String,

    /// The property's type.
    pub ty: TypeId,

    /// Whether the property may be absent or null.
    pub optional: bool,

    /// Free-form description lines, if any.
    pub description: Vec<String>,
}

/// The kind tag and payload of a type node.
#[derive(Debug, Clone)]
pub enum TypeKind {
    /// Unconstrained JSON value.
    Any,

    /// Exactly the JSON null value. Only legal as a union member.
    Null,

    Bool,
    Integer,
    Double,
    String,

    /// Homogeneous JSON array.
    Array { items: TypeId },

    /// Object with a fixed set of properties. Property order is
    /// insertion order and defines emission order.
    Class {
        name: String,
        properties: Vec<ClassProperty>,
    },

    /// String-keyed map with homogeneous values.
    Map { values: TypeId },

    /// Closed set of string cases.
    Enum { name: String, cases: Vec<String> },

    /// Sum of member types.
    Union { name: String, members: Vec<TypeId> },
}

impl TypeKind {
    /// Short lowercase tag for diagnostics.
    pub fn tag(&self) -> &'static str {
        match self {
            TypeKind::Any => "any",
            TypeKind::Null => "null",
            TypeKind::Bool => "bool",
            TypeKind::Integer => "integer",
            TypeKind::Double => "double",
            TypeKind::String => "string",
            TypeKind::Array { .. } => "array",
            TypeKind::Class { .. } => "class",
            TypeKind::Map { .. } => "map",
            TypeKind::Enum { .. } => "enum",
            TypeKind::Union { .. } => "union",
        }
    }
}

/// One node in the graph arena.
#[derive(Debug, Clone)]
pub struct TypeNode {
    pub kind: TypeKind,

    /// Free-form description lines attached to the type.
    pub description: Vec<String>,
}

/// A distinguished entry-point type.
#[derive(Debug, Clone)]
pub struct TopLevel {
    /// Proposed name for the entry point.
    pub name: String,

    pub ty: TypeId,
}

/// An immutable graph of type nodes plus its top-level entry points.
#[derive(Debug, Clone)]
pub struct TypeGraph {
    types: Vec<TypeNode>,
    top_levels: Vec<TopLevel>,
}

impl TypeGraph {
    /// Build a graph from raw parts, validating every structural
    /// invariant the renderer relies on.
    pub fn from_parts(types: Vec<TypeNode>, top_levels: Vec<TopLevel>) -> RenderResult<TypeGraph> {
        let graph = TypeGraph { types, top_levels };
        graph.validate()?;
        Ok(graph)
    }

    pub fn node(&self, id: TypeId) -> &TypeNode {
        &self.types[id.0]
    }

    pub fn kind(&self, id: TypeId) -> &TypeKind {
        &self.types[id.0].kind
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All nodes in arena (insertion) order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeNode)> {
        self.types.iter().enumerate().map(|(i, n)| (TypeId(i), n))
    }

    pub fn top_levels(&self) -> &[TopLevel] {
        &self.top_levels
    }

    /// Whether the node is a class, enum, or union.
    pub fn is_named(&self, id: TypeId) -> bool {
        matches!(
            self.kind(id),
            TypeKind::Class { .. } | TypeKind::Enum { .. } | TypeKind::Union { .. }
        )
    }

    /// The proposed identifier of a named type.
    pub fn proposed_name(&self, id: TypeId) -> Option<&str> {
        match self.kind(id) {
            TypeKind::Class { name, .. }
            | TypeKind::Enum { name, .. }
            | TypeKind::Union { name, .. } => Some(name),
            _ => None,
        }
    }

    /// If `id` is a union with exactly one non-null member and at least
    /// one null member, return the non-null member.
    ///
    /// Such unions render through the target's optional construct
    /// instead of a sum type.
    pub fn nullable_member(&self, id: TypeId) -> Option<TypeId> {
        let TypeKind::Union { members, .. } = self.kind(id) else {
            return None;
        };
        let mut non_null = None;
        let mut saw_null = false;
        for &m in members {
            if matches!(self.kind(m), TypeKind::Null) {
                saw_null = true;
            } else if non_null.replace(m).is_some() {
                return None;
            }
        }
        if saw_null {
            non_null
        } else {
            None
        }
    }

    /// Named types in arena insertion order.
    pub fn named_types(&self) -> Vec<TypeId> {
        self.iter()
            .filter(|(id, _)| self.is_named(*id))
            .map(|(id, _)| id)
            .collect()
    }

    /// Named types ordered so that every named type appears after the
    /// named types it references. Recursive groups (which by invariant
    /// cross a named boundary) are broken deterministically at the
    /// first revisited node.
    pub fn named_types_topological(&self) -> Vec<TypeId> {
        let mut finished: Vec<TypeId> = Vec::new();
        let mut state = vec![VisitState::Unvisited; self.types.len()];
        for id in self.named_types() {
            self.topo_visit(id, &mut state, &mut finished);
        }
        finished
    }

    fn topo_visit(&self, id: TypeId, state: &mut [VisitState], finished: &mut Vec<TypeId>) {
        if state[id.0] != VisitState::Unvisited {
            return;
        }
        state[id.0] = VisitState::InProgress;
        for dep in self.named_dependencies(id) {
            self.topo_visit(dep, state, finished);
        }
        state[id.0] = VisitState::Done;
        if self.is_named(id) {
            finished.push(id);
        }
    }

    /// Named types directly reachable from `id` without passing
    /// through another named type.
    fn named_dependencies(&self, id: TypeId) -> Vec<TypeId> {
        let mut deps = Vec::new();
        for child in self.children(id) {
            if self.is_named(child) {
                deps.push(child);
            } else {
                deps.extend(self.named_dependencies(child));
            }
        }
        deps
    }

    fn children(&self, id: TypeId) -> Vec<TypeId> {
        match self.kind(id) {
            TypeKind::Array { items } => vec![*items],
            TypeKind::Map { values } => vec![*values],
            TypeKind::Class { properties, .. } => properties.iter().map(|p| p.ty).collect(),
            TypeKind::Union { members, .. } => members.clone(),
            _ => Vec::new(),
        }
    }

    fn validate(&self) -> RenderResult<()> {
        self.check_references()?;
        self.check_null_placement()?;
        self.check_duplicates()?;
        self.check_structural_cycles()?;
        Ok(())
    }

    fn check_references(&self) -> RenderResult<()> {
        let in_range = |id: TypeId| -> RenderResult<()> {
            if id.0 >= self.types.len() {
                return Err(RenderError::InvalidGraph {
                    reason: format!("type reference {} is out of range", id.0),
                });
            }
            Ok(())
        };
        for node in &self.types {
            match &node.kind {
                TypeKind::Array { items } => in_range(*items)?,
                TypeKind::Map { values } => in_range(*values)?,
                TypeKind::Class { properties, .. } => {
                    for p in properties {
                        in_range(p.ty)?;
                    }
                }
                TypeKind::Union { members, .. } => {
                    for m in members {
                        in_range(*m)?;
                    }
                }
                _ => {}
            }
        }
        for tl in &self.top_levels {
            in_range(tl.ty)?;
        }
        Ok(())
    }

    /// Null appears only as a union member, never as a standalone
    /// property, array item, or map value type.
    fn check_null_placement(&self) -> RenderResult<()> {
        let complain = |context: &str, name: &str| -> RenderResult<()> {
            Err(RenderError::InvalidGraph {
                reason: format!("null type used outside a union ({context} '{name}')"),
            })
        };
        for node in &self.types {
            match &node.kind {
                TypeKind::Class { name, properties } => {
                    for p in properties {
                        if matches!(self.kind(p.ty), TypeKind::Null) {
                            return complain("property of class", name);
                        }
                    }
                }
                TypeKind::Array { items } => {
                    if matches!(self.kind(*items), TypeKind::Null) {
                        return complain("items of array", "");
                    }
                }
                TypeKind::Map { values } => {
                    if matches!(self.kind(*values), TypeKind::Null) {
                        return complain("values of map", "");
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn check_duplicates(&self) -> RenderResult<()> {
        for node in &self.types {
            match &node.kind {
                TypeKind::Enum { name, cases } => {
                    let mut seen = std::collections::HashSet::new();
                    for case in cases {
                        if !seen.insert(case.as_str()) {
                            return Err(RenderError::InvalidGraph {
                                reason: format!("enum '{name}' repeats case '{case}'"),
                            });
                        }
                    }
                }
                TypeKind::Class { name, properties } => {
                    let mut seen = std::collections::HashSet::new();
                    for p in properties {
                        if !seen.insert(p.json_name.as_str()) {
                            return Err(RenderError::InvalidGraph {
                                reason: format!(
                                    "class '{name}' repeats property '{}'",
                                    p.json_name
                                ),
                            });
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// A cycle that never crosses a named type cannot be rendered;
    /// recursion is only legal through classes, enums, and unions.
    /// Checked on the subgraph of unnamed nodes: a violating cycle is
    /// exactly a cycle that contains no named node.
    fn check_structural_cycles(&self) -> RenderResult<()> {
        let mut state = vec![VisitState::Unvisited; self.types.len()];
        for (id, _) in self.iter() {
            if !self.is_named(id) {
                self.cycle_visit(id, &mut state)?;
            }
        }
        Ok(())
    }

    fn cycle_visit(&self, id: TypeId, state: &mut [VisitState]) -> RenderResult<()> {
        match state[id.0] {
            VisitState::Done => return Ok(()),
            VisitState::InProgress => {
                return Err(RenderError::CycleBeyondNamedBoundary { at: id });
            }
            VisitState::Unvisited => {}
        }
        state[id.0] = VisitState::InProgress;
        for child in self.children(id) {
            if !self.is_named(child) {
                self.cycle_visit(child, state)?;
            }
        }
        state[id.0] = VisitState::Done;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done,
}

/// Incremental constructor for a [`TypeGraph`].
///
/// Every `add_*` method appends a node and returns its reference;
/// forward references can be made with [`TypeId::new`] against a
/// not-yet-added index and are validated by [`TypeGraphBuilder::finish`].
#[derive(Debug, Default)]
pub struct TypeGraphBuilder {
    types: Vec<TypeNode>,
    top_levels: Vec<TopLevel>,
}

impl TypeGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: TypeKind) -> TypeId {
        let id = TypeId(self.types.len());
        self.types.push(TypeNode {
            kind,
            description: Vec::new(),
        });
        id
    }

    pub fn add_any(&mut self) -> TypeId {
        self.push(TypeKind::Any)
    }

    pub fn add_null(&mut self) -> TypeId {
        self.push(TypeKind::Null)
    }

    pub fn add_bool(&mut self) -> TypeId {
        self.push(TypeKind::Bool)
    }

    pub fn add_integer(&mut self) -> TypeId {
        self.push(TypeKind::Integer)
    }

    pub fn add_double(&mut self) -> TypeId {
        self.push(TypeKind::Double)
    }

    pub fn add_string(&mut self) -> TypeId {
        self.push(TypeKind::String)
    }

    pub fn add_array(&mut self, items: TypeId) -> TypeId {
        self.push(TypeKind::Array { items })
    }

    pub fn add_map(&mut self, values: TypeId) -> TypeId {
        self.push(TypeKind::Map { values })
    }

    pub fn add_class(
        &mut self,
        name: impl Into<String>,
        properties: Vec<ClassProperty>,
    ) -> TypeId {
        self.push(TypeKind::Class {
            name: name.into(),
            properties,
        })
    }

    pub fn add_enum(
        &mut self,
        name: impl Into<String>,
        cases: Vec<String>,
    ) -> TypeId {
        self.push(TypeKind::Enum {
            name: name.into(),
            cases,
        })
    }

    pub fn add_union(
        &mut self,
        name: impl Into<String>,
        members: Vec<TypeId>,
    ) -> TypeId {
        self.push(TypeKind::Union {
            name: name.into(),
            members,
        })
    }

    pub fn set_description(&mut self, id: TypeId, lines: Vec<String>) {
        self.types[id.0].description = lines;
    }

    pub fn add_top_level(&mut self, name: impl Into<String>, ty: TypeId) {
        self.top_levels.push(TopLevel {
            name: name.into(),
            ty,
        });
    }

    pub fn finish(self) -> RenderResult<TypeGraph> {
        TypeGraph::from_parts(self.types, self.top_levels)
    }
}

/// Shorthand for a required property with no description.
pub fn property(json_name: impl Into<String>, ty: TypeId) -> ClassProperty {
    ClassProperty {
        json_name: json_name.into(),
        ty,
        optional: false,
        description: Vec::new(),
    }
}

/// Shorthand for an optional property with no description.
pub fn optional_property(json_name: impl Into<String>, ty: TypeId) -> ClassProperty {
    ClassProperty {
        json_name: json_name.into(),
        ty,
        optional: true,
        description: Vec::new(),
    }
}
