//! The convenience renderer.
//!
//! [`render`] drives a full pass over a [`TypeGraph`]: it assigns
//! names in every namespace, seals the arena, and then invokes the
//! [`Target`] hooks in a fixed phase order:
//!
//! 1. name assignment (arena sealed at the end)
//! 2. header (leading comments, imports)
//! 3. prelude (declarations that precede named types)
//! 4. body (named types, dependency order when the target requires it)
//! 5. top-level aliases (entry points that are not themselves named)
//!
//! The driver owns phase order, blank-line separation, and the
//! name-handle bookkeeping; targets only synthesize fragments.

use std::collections::HashMap;

use crate::error::{RenderError, RenderResult};
use crate::graph::{ClassProperty, TypeGraph, TypeId, TypeKind};
use crate::namer::{ForbiddenWords, NameArena, NameId, NamespaceId};
use crate::naming::{Legalizer, WordStyle};
use crate::options::RenderOptions;
use crate::source::{BlankLinePolicy, Emitter};

/// Word styling plus legality rules for one namespace.
#[derive(Debug, Clone, Copy)]
pub struct NameStyle {
    pub words: WordStyle,
    pub legal: Legalizer,
}

/// The hook set a target language supplies.
///
/// Everything not listed here (phase order, separators, name
/// bookkeeping) is inherited from the driver.
pub trait Target {
    /// File extension of generated sources, without the dot.
    fn extension(&self) -> &'static str;

    fn indent_unit(&self) -> &'static str {
        "  "
    }

    fn comment_prefix(&self) -> &'static str {
        "//"
    }

    fn type_style(&self) -> NameStyle;
    fn property_style(&self) -> NameStyle;
    fn enum_case_style(&self) -> NameStyle;

    fn union_member_style(&self) -> NameStyle {
        self.property_style()
    }

    /// Style for the generated file's name stem.
    fn file_stem_style(&self) -> NameStyle {
        self.property_style()
    }

    fn forbidden_for_types(&self) -> ForbiddenWords;
    fn forbidden_for_properties(&self) -> ForbiddenWords;
    fn forbidden_for_enum_cases(&self) -> ForbiddenWords;

    fn forbidden_for_union_members(&self) -> ForbiddenWords {
        self.forbidden_for_properties()
    }

    /// Whether named types must be declared before they are referenced,
    /// forcing a topological body order.
    fn needs_type_declaration_before_use(&self) -> bool;

    fn emit_header(&self, ctx: &mut RenderContext, options: &RenderOptions) -> RenderResult<()>;
    fn emit_prelude(&self, ctx: &mut RenderContext) -> RenderResult<()>;
    fn emit_named_type(&self, ctx: &mut RenderContext, id: TypeId) -> RenderResult<()>;

    /// Emit an entry point whose type is not itself a named type.
    fn emit_top_level_alias(
        &self,
        ctx: &mut RenderContext,
        name: NameId,
        ty: TypeId,
    ) -> RenderResult<()>;
}

/// A top-level's assigned name, and whether it was reused from a
/// directly-named type rather than freshly allocated.
#[derive(Debug, Clone, Copy)]
pub struct TopLevelName {
    pub name: NameId,
    pub reused: bool,
}

/// Every name handle allocated for one render pass.
#[derive(Debug)]
pub struct Names {
    pub arena: NameArena,
    type_names: HashMap<TypeId, NameId>,
    property_names: HashMap<(TypeId, usize), NameId>,
    case_names: HashMap<(TypeId, usize), NameId>,
    member_names: HashMap<(TypeId, usize), NameId>,
    top_levels: Vec<TopLevelName>,
}

impl Names {
    fn assign(graph: &TypeGraph, target: &dyn Target) -> Names {
        let mut arena = NameArena::new();
        let mut type_names = HashMap::new();
        let mut property_names = HashMap::new();
        let mut case_names = HashMap::new();
        let mut member_names = HashMap::new();

        let type_style = target.type_style();
        let types_ns = arena.add_namespace(
            "types",
            type_style.words,
            type_style.legal,
            target.forbidden_for_types(),
            true,
        );

        // Named types first, in graph order, so the global namespace
        // is stable under graph extension.
        for (id, _) in graph.iter() {
            if let Some(proposed) = graph.proposed_name(id) {
                let handle = arena.name(types_ns, proposed);
                type_names.insert(id, handle);
            }
        }

        let mut top_levels = Vec::new();
        for top_level in graph.top_levels() {
            match type_names.get(&top_level.ty) {
                Some(&name) => top_levels.push(TopLevelName { name, reused: true }),
                None => {
                    let name = arena.name(types_ns, top_level.name.as_str());
                    top_levels.push(TopLevelName {
                        name,
                        reused: false,
                    });
                }
            }
        }

        for (id, node) in graph.iter() {
            match &node.kind {
                TypeKind::Class { name, properties } => {
                    let ns = Self::scoped_namespace(
                        &mut arena,
                        format!("properties of {name}"),
                        target.property_style(),
                        target.forbidden_for_properties(),
                    );
                    for (index, property) in properties.iter().enumerate() {
                        let handle = arena.name(ns, property.json_name.as_str());
                        property_names.insert((id, index), handle);
                    }
                }
                TypeKind::Enum { name, cases } => {
                    let ns = Self::scoped_namespace(
                        &mut arena,
                        format!("cases of {name}"),
                        target.enum_case_style(),
                        target.forbidden_for_enum_cases(),
                    );
                    for (index, case) in cases.iter().enumerate() {
                        let handle = arena.name(ns, case.as_str());
                        case_names.insert((id, index), handle);
                    }
                }
                TypeKind::Union { name, members } => {
                    // Nullable unions render through the optional
                    // construct and need no member names.
                    if graph.nullable_member(id).is_some() {
                        continue;
                    }
                    let ns = Self::scoped_namespace(
                        &mut arena,
                        format!("members of {name}"),
                        target.union_member_style(),
                        target.forbidden_for_union_members(),
                    );
                    for (index, &member) in members.iter().enumerate() {
                        let proposed = graph
                            .proposed_name(member)
                            .map(str::to_string)
                            .unwrap_or_else(|| graph.kind(member).tag().to_string());
                        let handle = arena.name(ns, proposed);
                        member_names.insert((id, index), handle);
                    }
                }
                _ => {}
            }
        }

        arena.seal();
        Names {
            arena,
            type_names,
            property_names,
            case_names,
            member_names,
            top_levels,
        }
    }

    fn scoped_namespace(
        arena: &mut NameArena,
        label: String,
        style: NameStyle,
        forbidden: ForbiddenWords,
    ) -> NamespaceId {
        arena.add_namespace(label, style.words, style.legal, forbidden, false)
    }

    pub fn type_name(&self, id: TypeId) -> RenderResult<NameId> {
        self.type_names
            .get(&id)
            .copied()
            .ok_or_else(|| RenderError::InvalidGraph {
                reason: format!("type {} has no name handle", id.index()),
            })
    }

    pub fn property_name(&self, class: TypeId, index: usize) -> RenderResult<NameId> {
        self.property_names
            .get(&(class, index))
            .copied()
            .ok_or_else(|| RenderError::InvalidGraph {
                reason: format!("class {} has no property {index}", class.index()),
            })
    }

    pub fn case_name(&self, enum_type: TypeId, index: usize) -> RenderResult<NameId> {
        self.case_names
            .get(&(enum_type, index))
            .copied()
            .ok_or_else(|| RenderError::InvalidGraph {
                reason: format!("enum {} has no case {index}", enum_type.index()),
            })
    }

    pub fn member_name(&self, union: TypeId, index: usize) -> RenderResult<NameId> {
        self.member_names
            .get(&(union, index))
            .copied()
            .ok_or_else(|| RenderError::InvalidGraph {
                reason: format!("union {} has no member {index}", union.index()),
            })
    }

    pub fn top_level_names(&self) -> &[TopLevelName] {
        &self.top_levels
    }
}

/// Everything a target hook can reach: the graph, the sealed names,
/// and the output emitter.
pub struct RenderContext<'g> {
    pub graph: &'g TypeGraph,
    pub names: Names,
    pub out: Emitter,
}

impl<'g> RenderContext<'g> {
    /// Visit a class's properties in declaration order with their
    /// assigned name handles. The returned references borrow the
    /// graph, not the context, so emission can proceed while they are
    /// held.
    pub fn class_properties(
        &self,
        class: TypeId,
    ) -> RenderResult<Vec<(NameId, &'g ClassProperty)>> {
        let graph = self.graph;
        let TypeKind::Class { properties, .. } = graph.kind(class) else {
            return Err(RenderError::UnsupportedTypeShape {
                kind: graph.kind(class).tag(),
            });
        };
        let mut visited = Vec::with_capacity(properties.len());
        for (index, property) in properties.iter().enumerate() {
            visited.push((self.names.property_name(class, index)?, property));
        }
        Ok(visited)
    }

    /// Visit an enum's cases in declaration order with their assigned
    /// name handles.
    pub fn enum_cases(&self, enum_type: TypeId) -> RenderResult<Vec<(NameId, &'g str)>> {
        let graph = self.graph;
        let TypeKind::Enum { cases, .. } = graph.kind(enum_type) else {
            return Err(RenderError::UnsupportedTypeShape {
                kind: graph.kind(enum_type).tag(),
            });
        };
        let mut visited = Vec::with_capacity(cases.len());
        for (index, case) in cases.iter().enumerate() {
            visited.push((self.names.case_name(enum_type, index)?, case.as_str()));
        }
        Ok(visited)
    }

    /// Visit a union's members with their assigned name handles.
    /// Only valid for non-nullable unions.
    pub fn union_members(&self, union: TypeId) -> RenderResult<Vec<(NameId, TypeId)>> {
        let TypeKind::Union { members, .. } = self.graph.kind(union) else {
            return Err(RenderError::UnsupportedTypeShape {
                kind: self.graph.kind(union).tag(),
            });
        };
        let mut visited = Vec::with_capacity(members.len());
        for (index, &member) in members.iter().enumerate() {
            visited.push((self.names.member_name(union, index)?, member));
        }
        Ok(visited)
    }
}

/// The rendered output: a line stream plus the file naming the driver
/// should use.
#[derive(Debug, Clone)]
pub struct RenderedFile {
    pub lines: Vec<String>,
    pub extension: String,
    pub file_stem: String,
}

impl RenderedFile {
    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// Run a full render pass over `graph` with the given target.
pub fn render(
    graph: &TypeGraph,
    target: &dyn Target,
    options: &RenderOptions,
) -> RenderResult<RenderedFile> {
    let names = Names::assign(graph, target);
    tracing::debug!(types = graph.len(), "names assigned and sealed");

    let mut ctx = RenderContext {
        graph,
        names,
        out: Emitter::new(target.indent_unit(), target.comment_prefix()),
    };

    target.emit_header(&mut ctx, options)?;
    target.emit_prelude(&mut ctx)?;

    let body_order = if target.needs_type_declaration_before_use() {
        graph.named_types_topological()
    } else {
        graph.named_types()
    };
    for id in body_order {
        if options.blank_lines != BlankLinePolicy::None {
            ctx.out.ensure_blank_line();
        }
        target.emit_named_type(&mut ctx, id)?;
    }
    tracing::debug!("body emitted");

    let top_level_names = ctx.names.top_level_names().to_vec();
    for (index, top_level) in top_level_names.into_iter().enumerate() {
        if top_level.reused {
            continue;
        }
        if options.blank_lines != BlankLinePolicy::None {
            ctx.out.ensure_blank_line();
        }
        target.emit_top_level_alias(&mut ctx, top_level.name, graph.top_levels()[index].ty)?;
    }

    let file_stem = file_stem(&ctx, target)?;
    let lines = ctx.out.finish(&ctx.names.arena)?;
    tracing::debug!(lines = lines.len(), "render finished");

    Ok(RenderedFile {
        lines,
        extension: target.extension().to_string(),
        file_stem,
    })
}

/// Canonical file-name stem: the first top-level's assigned name,
/// restyled for file names; `generated` when the graph has no
/// top-level at all.
fn file_stem(ctx: &RenderContext, target: &dyn Target) -> RenderResult<String> {
    let style = target.file_stem_style();
    match ctx.names.top_level_names().first() {
        Some(top_level) => {
            let resolved = ctx.names.arena.resolved(top_level.name)?;
            Ok(style.words.name_from(resolved, &style.legal))
        }
        None => Ok("generated".to_string()),
    }
}

#[cfg(test)]
#[path = "render/render_tests.rs"]
mod render_tests;
