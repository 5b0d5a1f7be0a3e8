//! Ruby code generation on the dry-struct / dry-types stack.
//!
//! Generated files declare a `Types` module (primitive aliases plus
//! one `Strict::String.enum` per schema enum), a value-table module
//! per enum, and one `Dry::Struct` class per schema class with
//! `from_dynamic`/`to_dynamic` converters and JSON-string wrappers.
//!
//! # Type expressions
//!
//! | Schema type | Attribute expression |
//! |-------------|----------------------|
//! | `integer` | `Types::Int` |
//! | `double` | `Types::Decimal` |
//! | `string` | `Types::String` |
//! | `array<T>` | `Types.Array(T)` |
//! | `map<string, T>` | `Types::Hash.meta(of: T)` |
//! | class `C` | `C` (or `Types.Instance(C)` inside a container) |
//! | enum `E` | `Types::E` |
//! | nullable of `T` | `T.optional` |
//!
//! Converters are elided whenever a type marshals implicitly, that is
//! when its JSON shape equals its domain shape. The two directions
//! differ: an enum parses through the `Types::E[...]` lookup but
//! serializes as the plain string it already is.

use crate::error::{RenderError, RenderResult};
use crate::graph::{TypeGraph, TypeId, TypeKind};
use crate::namer::{ForbiddenWords, NameId};
use crate::naming::{Legalizer, WordStyle};
use crate::options::RenderOptions;
use crate::render::{NameStyle, RenderContext, Target};
use crate::source::{Annotation, Source};
use crate::src;

/// Ruby reserved words; none may be assigned in any namespace.
const RESERVED: &[&str] = &[
    "BEGIN", "END", "alias", "and", "begin", "break", "case", "class", "def", "do", "else",
    "elsif", "end", "ensure", "false", "for", "if", "in", "module", "next", "nil", "not", "or",
    "redo", "rescue", "retry", "return", "self", "super", "then", "true", "undef", "unless",
    "until", "when", "while", "yield",
];

/// Identifiers the generated file itself claims.
const CLAIMED_TYPE_NAMES: &[&str] = &["Types", "Dry"];

/// Where a type expression appears; classes spell differently inside
/// containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExprPosition {
    Attribute,
    Inner,
}

/// How a union renders.
#[derive(Debug)]
enum UnionShape {
    /// Only null members; the value is always nil.
    NullOnly,
    /// One non-null member and no null: a transparent alias.
    Single(TypeId),
    /// One non-null member plus null: the optional construct.
    Nullable(TypeId),
    /// Every member marshals implicitly and the JSON guards are
    /// disjoint: a dry-types sum with identity converters.
    Implicit(Vec<TypeId>),
    /// A named wrapper with guard-dispatched converters.
    Explicit(Vec<TypeId>),
}

/// JSON-level value guard used to discriminate explicit sums.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Guard {
    Null,
    Bool,
    Int,
    Double,
    String,
    Array,
    Object,
}

impl Guard {
    fn label(self) -> &'static str {
        match self {
            Guard::Null => "null",
            Guard::Bool => "bool",
            Guard::Int => "integer",
            Guard::Double => "double",
            Guard::String => "string",
            Guard::Array => "array",
            Guard::Object => "object",
        }
    }

    /// Fixed dispatch order. Int precedes Double so the narrower
    /// `Integer` test runs before the `Numeric` one.
    fn order(self) -> usize {
        match self {
            Guard::Bool => 0,
            Guard::Int => 1,
            Guard::Double => 2,
            Guard::String => 3,
            Guard::Array => 4,
            Guard::Object => 5,
            Guard::Null => 6,
        }
    }

    fn test(self, expr: &Source) -> Source {
        match self {
            Guard::Null => src![expr.clone(), ".nil?"],
            Guard::Bool => src![
                expr.clone(),
                ".is_a?(TrueClass) || ",
                expr.clone(),
                ".is_a?(FalseClass)"
            ],
            Guard::Int => src![expr.clone(), ".is_a?(Integer)"],
            Guard::Double => src![expr.clone(), ".is_a?(Numeric)"],
            Guard::String => src![expr.clone(), ".is_a?(String)"],
            Guard::Array => src![expr.clone(), ".is_a?(Array)"],
            Guard::Object => src![expr.clone(), ".is_a?(Hash)"],
        }
    }
}

/// The Ruby back-end.
#[derive(Debug, Default)]
pub struct RubyTarget;

impl RubyTarget {
    pub fn new() -> RubyTarget {
        RubyTarget
    }
}

impl Target for RubyTarget {
    fn extension(&self) -> &'static str {
        "rb"
    }

    fn comment_prefix(&self) -> &'static str {
        "#"
    }

    fn type_style(&self) -> NameStyle {
        NameStyle {
            words: WordStyle::pascal(),
            legal: Legalizer::ascii(),
        }
    }

    fn property_style(&self) -> NameStyle {
        NameStyle {
            words: WordStyle::snake(),
            legal: Legalizer::ascii(),
        }
    }

    fn enum_case_style(&self) -> NameStyle {
        NameStyle {
            words: WordStyle::pascal(),
            legal: Legalizer::ascii(),
        }
    }

    fn forbidden_for_types(&self) -> ForbiddenWords {
        let mut words = ForbiddenWords::reserved(RESERVED, false);
        words
            .names
            .extend(CLAIMED_TYPE_NAMES.iter().map(|w| w.to_string()));
        words
    }

    fn forbidden_for_properties(&self) -> ForbiddenWords {
        ForbiddenWords::reserved(RESERVED, false)
    }

    fn forbidden_for_enum_cases(&self) -> ForbiddenWords {
        ForbiddenWords::reserved(RESERVED, false)
    }

    fn needs_type_declaration_before_use(&self) -> bool {
        // Class bodies evaluate their attribute expressions at load
        // time, so referenced constants must already exist.
        true
    }

    fn emit_header(&self, ctx: &mut RenderContext, options: &RenderOptions) -> RenderResult<()> {
        if options.leading_comments.is_empty() {
            ctx.out.emit_comment_lines(&[
                "To parse JSON into typed structs and serialize it back, add the".to_string(),
                "'dry-struct' and 'dry-types' gems, then:".to_string(),
            ]);
            if let Some(top_level) = ctx.names.top_level_names().first() {
                let name = top_level.name;
                ctx.out.emit_line("#");
                ctx.out
                    .emit_line(src!["#   instance = ", name, ".from_json(json_string)"]);
                ctx.out.emit_line("#   instance.to_json");
            }
        } else {
            ctx.out.emit_comment_lines(&options.leading_comments);
        }
        ctx.out.blank_line();
        ctx.out.emit_line("require 'json'");
        ctx.out.emit_line("require 'dry-types'");
        ctx.out.emit_line("require 'dry-struct'");
        Ok(())
    }

    fn emit_prelude(&self, ctx: &mut RenderContext) -> RenderResult<()> {
        let mut rows: Vec<Vec<Source>> = vec![
            vec![src!["Int"], src!["= Strict::Integer"]],
            vec![src!["Nil"], src!["= Strict::Nil"]],
            vec![src!["Bool"], src!["= Strict::Bool"]],
            vec![src!["Hash"], src!["= Strict::Hash"]],
            vec![src!["String"], src!["= Strict::String"]],
            vec![src!["Decimal"], src!["= Strict::Float | Strict::Integer"]],
            vec![src!["Any"], src!["= Nominal::Any"]],
        ];
        for (id, node) in ctx.graph.iter() {
            if let TypeKind::Enum { cases, .. } = &node.kind {
                let name = ctx.names.type_name(id)?;
                let mut entry = vec![Source::from("= Strict::String.enum(")];
                for (index, case) in cases.iter().enumerate() {
                    if index > 0 {
                        entry.push(Source::from(", "));
                    }
                    entry.push(Source::from(string_literal(case)));
                }
                entry.push(Source::from(")"));
                rows.push(vec![src![name], Source::Sequence(entry)]);
            }
        }

        ctx.out.ensure_blank_line();
        ctx.out.emit_block(
            "module Types",
            |out| {
                out.emit_line("include Dry.Types(default: :nominal)");
                out.blank_line();
                out.emit_table(rows);
                Ok(())
            },
            "end",
        )
    }

    fn emit_named_type(&self, ctx: &mut RenderContext, id: TypeId) -> RenderResult<()> {
        match ctx.graph.kind(id) {
            TypeKind::Class { .. } => self.emit_class(ctx, id),
            TypeKind::Enum { .. } => self.emit_enum_module(ctx, id),
            TypeKind::Union { .. } => self.emit_union(ctx, id),
            other => Err(RenderError::UnsupportedTypeShape { kind: other.tag() }),
        }
    }

    fn emit_top_level_alias(
        &self,
        ctx: &mut RenderContext,
        name: NameId,
        ty: TypeId,
    ) -> RenderResult<()> {
        let from_body = self.from_dynamic_expr(ctx, ty, false, Source::from("d"))?;
        let to_body = self.to_dynamic_expr(ctx, ty, false, Source::from("xs"))?;

        ctx.out.emit_block(
            src!["module ", name],
            |out| {
                out.emit_block(
                    "def self.from_dynamic(d)",
                    |out| {
                        out.emit_line(from_body);
                        Ok(())
                    },
                    "end",
                )?;
                out.blank_line();
                out.emit_block(
                    "def self.from_json(json)",
                    |out| {
                        out.emit_line("from_dynamic(JSON.parse(json))");
                        Ok(())
                    },
                    "end",
                )?;
                out.blank_line();
                out.emit_block(
                    "def self.to_dynamic(xs)",
                    |out| {
                        out.emit_line(to_body);
                        Ok(())
                    },
                    "end",
                )?;
                out.blank_line();
                out.emit_block(
                    "def self.to_json(xs, options = nil)",
                    |out| {
                        out.emit_line("JSON.generate(to_dynamic(xs), options)");
                        Ok(())
                    },
                    "end",
                )
            },
            "end",
        )
    }
}

impl RubyTarget {
    fn emit_enum_module(&self, ctx: &mut RenderContext, id: TypeId) -> RenderResult<()> {
        let name = ctx.names.type_name(id)?;
        let cases = ctx.enum_cases(id)?;
        let rows: Vec<Vec<Source>> = cases
            .iter()
            .map(|(case_name, case)| {
                vec![src![*case_name], src!["= ", string_literal(case)]]
            })
            .collect();

        self.emit_type_description(ctx, id);
        ctx.out.emit_block(
            src!["module ", name],
            |out| {
                out.emit_table(rows);
                Ok(())
            },
            "end",
        )
    }

    fn emit_class(&self, ctx: &mut RenderContext, id: TypeId) -> RenderResult<()> {
        let class_name = ctx.names.type_name(id)?;
        let properties = ctx.class_properties(id)?;

        let mut attribute_rows: Vec<Vec<Source>> = Vec::new();
        let mut descriptions: Vec<&[String]> = Vec::new();
        let mut from_rows: Vec<Vec<Source>> = Vec::new();
        let mut to_rows: Vec<Vec<Source>> = Vec::new();
        for (name, property) in &properties {
            let json_key = string_literal(&property.json_name);
            attribute_rows.push(vec![
                src!["attribute :", *name, ","],
                self.attribute_type(ctx, property.ty, property.optional)?,
            ]);
            descriptions.push(&property.description);
            from_rows.push(vec![
                src![*name, ":"],
                src![
                    self.from_dynamic_expr(
                        ctx,
                        property.ty,
                        property.optional,
                        src!["d[", json_key.clone(), "]"],
                    )?,
                    ","
                ],
            ]);
            to_rows.push(vec![
                src![json_key],
                src![
                    "=> ",
                    self.to_dynamic_expr(ctx, property.ty, property.optional, src!["@", *name])?,
                    ","
                ],
            ]);
        }
        let described = descriptions.iter().any(|d| !d.is_empty());
        let comment_prefix = self.comment_prefix().to_string();

        self.emit_type_description(ctx, id);
        ctx.out.emit_block(
            src!["class ", class_name, " < Dry::Struct"],
            |out| {
                if described {
                    // Comments break column alignment, so described
                    // classes list attributes one by one.
                    for (index, row) in attribute_rows.into_iter().enumerate() {
                        if !descriptions[index].is_empty() {
                            out.ensure_blank_line();
                            for line in descriptions[index] {
                                out.emit_line(Source::Text(format!("{comment_prefix} {line}")));
                            }
                        }
                        let mut parts = Vec::new();
                        for (column, cell) in row.into_iter().enumerate() {
                            if column > 0 {
                                parts.push(Source::from(" "));
                            }
                            parts.push(cell);
                        }
                        out.emit_line(Source::Sequence(parts));
                    }
                } else {
                    out.emit_table(attribute_rows);
                }
                out.blank_line();
                out.emit_block(
                    "def self.from_dynamic(d)",
                    |out| {
                        out.emit_line("d = Types::Hash[d]");
                        out.emit_line("new(");
                        out.indent(|out| {
                            out.emit_table(from_rows);
                            Ok(())
                        })?;
                        out.emit_line(")");
                        Ok(())
                    },
                    "end",
                )?;
                out.blank_line();
                out.emit_block(
                    "def self.from_json(json)",
                    |out| {
                        out.emit_line("from_dynamic(JSON.parse(json))");
                        Ok(())
                    },
                    "end",
                )?;
                out.blank_line();
                out.emit_block(
                    "def to_dynamic",
                    |out| {
                        out.emit_line("{");
                        out.indent(|out| {
                            out.emit_table(to_rows);
                            Ok(())
                        })?;
                        out.emit_line("}");
                        Ok(())
                    },
                    "end",
                )?;
                out.blank_line();
                out.emit_block(
                    "def to_json(options = nil)",
                    |out| {
                        out.emit_line("JSON.generate(to_dynamic, options)");
                        Ok(())
                    },
                    "end",
                )
            },
            "end",
        )
    }

    fn emit_union(&self, ctx: &mut RenderContext, id: TypeId) -> RenderResult<()> {
        let members = match union_shape(ctx.graph, id) {
            // Inlined at every use site; nothing to declare.
            Some(UnionShape::NullOnly)
            | Some(UnionShape::Single(_))
            | Some(UnionShape::Nullable(_))
            | Some(UnionShape::Implicit(_)) => return Ok(()),
            Some(UnionShape::Explicit(members)) => members,
            None => {
                return Err(RenderError::UnsupportedTypeShape {
                    kind: ctx.graph.kind(id).tag(),
                })
            }
        };
        let union_name = ctx.names.type_name(id)?;
        let named_members = ctx.union_members(id)?;

        // Branches dispatch in fixed guard order; duplicate guards
        // cannot be told apart at the JSON layer.
        let mut branches: Vec<(Guard, usize)> = Vec::new();
        for (index, &member) in members.iter().enumerate() {
            let guard = value_guard(ctx.graph, member)?;
            if branches.iter().any(|(seen, _)| *seen == guard) {
                return Err(RenderError::UnresolvableUnion {
                    guard: guard.label(),
                });
            }
            branches.push((guard, index));
        }
        branches.sort_by_key(|(guard, _)| guard.order());

        let mut attribute_rows: Vec<Vec<Source>> = Vec::new();
        for (member_name, member) in &named_members {
            if matches!(ctx.graph.kind(*member), TypeKind::Null) {
                continue;
            }
            attribute_rows.push(vec![
                src!["attribute? :", *member_name, ","],
                src![self.dry_type(ctx, *member, ExprPosition::Inner)?, ".optional"],
            ]);
        }

        let mut from_branches: Vec<(Source, Source)> = Vec::new();
        let mut to_branches: Vec<(Source, Source)> = Vec::new();
        let d = Source::from("d");
        for &(guard, index) in &branches {
            let (member_name, member) = named_members[index];
            let test = guard.test(&d);
            if guard == Guard::Null {
                from_branches.push((test, Source::from("new")));
                continue;
            }
            let value = self.from_dynamic_expr(ctx, member, false, d.clone())?;
            from_branches.push((test, src!["new(", member_name, ": ", value, ")"]));
            let stored = src!["@", member_name];
            to_branches.push((
                src!["!@", member_name, ".nil?"],
                self.to_dynamic_expr(ctx, member, false, stored)?,
            ));
        }

        self.emit_type_description(ctx, id);
        ctx.out.emit_block(
            src!["class ", union_name, " < Dry::Struct"],
            |out| {
                out.emit_table(attribute_rows);
                out.blank_line();
                out.emit_block(
                    "def self.from_dynamic(d)",
                    |out| {
                        emit_if_chain(out, from_branches, Some("raise \"Invalid union value: #{d}\""))
                    },
                    "end",
                )?;
                out.blank_line();
                out.emit_block(
                    "def self.from_json(json)",
                    |out| {
                        out.emit_line("from_dynamic(JSON.parse(json))");
                        Ok(())
                    },
                    "end",
                )?;
                out.blank_line();
                out.emit_block(
                    "def to_dynamic",
                    |out| emit_if_chain(out, to_branches, None),
                    "end",
                )?;
                out.blank_line();
                out.emit_block(
                    "def to_json(options = nil)",
                    |out| {
                        out.emit_line("JSON.generate(to_dynamic, options)");
                        Ok(())
                    },
                    "end",
                )
            },
            "end",
        )
    }

    fn emit_type_description(&self, ctx: &mut RenderContext, id: TypeId) {
        let description = ctx.graph.node(id).description.clone();
        if !description.is_empty() {
            ctx.out.emit_comment_lines(&description);
        }
    }

    /// Type expression for an attribute declaration, with the optional
    /// marker folded in. A nullable union contributes the same
    /// `.optional` suffix as an optional property; the two never
    /// stack.
    fn attribute_type(
        &self,
        ctx: &RenderContext,
        ty: TypeId,
        optional: bool,
    ) -> RenderResult<Source> {
        let (core, nullable) = match union_shape(ctx.graph, ty) {
            Some(UnionShape::Nullable(member)) => (member, true),
            _ => (ty, false),
        };
        if optional || nullable {
            // `.optional` only chains off a dry-types expression, so a
            // bare class constant needs the Instance wrapper here.
            let base = self.dry_type(ctx, core, ExprPosition::Inner)?;
            Ok(src![base, ".optional"])
        } else {
            Ok(self.dry_type(ctx, core, ExprPosition::Attribute)?)
        }
    }

    fn dry_type(
        &self,
        ctx: &RenderContext,
        ty: TypeId,
        position: ExprPosition,
    ) -> RenderResult<Source> {
        let source = match ctx.graph.kind(ty) {
            TypeKind::Any => {
                tracing::warn!("emitting an unconstrained 'any' type expression");
                Source::annotated(Annotation::AnyType, "Types::Any")
            }
            TypeKind::Null => Source::from("Types::Nil"),
            TypeKind::Bool => Source::from("Types::Bool"),
            TypeKind::Integer => Source::from("Types::Int"),
            TypeKind::Double => Source::from("Types::Decimal"),
            TypeKind::String => Source::from("Types::String"),
            TypeKind::Array { items } => {
                src!["Types.Array(", self.dry_type(ctx, *items, ExprPosition::Inner)?, ")"]
            }
            TypeKind::Map { values } => src![
                "Types::Hash.meta(of: ",
                self.dry_type(ctx, *values, ExprPosition::Inner)?,
                ")"
            ],
            TypeKind::Class { .. } => {
                let name = ctx.names.type_name(ty)?;
                match position {
                    ExprPosition::Attribute => src![name],
                    ExprPosition::Inner => src!["Types.Instance(", name, ")"],
                }
            }
            TypeKind::Enum { .. } => src!["Types::", ctx.names.type_name(ty)?],
            TypeKind::Union { .. } => match union_shape(ctx.graph, ty) {
                Some(UnionShape::NullOnly) => {
                    Source::annotated(Annotation::NullOnly, "Types::Nil")
                }
                Some(UnionShape::Single(member)) => self.dry_type(ctx, member, position)?,
                Some(UnionShape::Nullable(member)) => {
                    src![self.dry_type(ctx, member, ExprPosition::Inner)?, ".optional"]
                }
                Some(UnionShape::Implicit(members)) => {
                    let mut parts = vec![Source::from("(")];
                    for (index, member) in members.iter().enumerate() {
                        if index > 0 {
                            parts.push(Source::from(" | "));
                        }
                        parts.push(self.dry_type(ctx, *member, ExprPosition::Inner)?);
                    }
                    parts.push(Source::from(")"));
                    Source::Sequence(parts)
                }
                Some(UnionShape::Explicit(_)) => {
                    let name = ctx.names.type_name(ty)?;
                    match position {
                        ExprPosition::Attribute => src![name],
                        ExprPosition::Inner => src!["Types.Instance(", name, ")"],
                    }
                }
                None => unreachable!("kind checked above"),
            },
        };
        Ok(source)
    }

    /// Convert a JSON-shaped expression into the domain shape.
    ///
    /// Implicitly-marshalling types pass the expression through
    /// untouched; optional non-implicit conversions are guarded with a
    /// nil check so absent keys survive.
    fn from_dynamic_expr(
        &self,
        ctx: &RenderContext,
        ty: TypeId,
        optional: bool,
        expr: Source,
    ) -> RenderResult<Source> {
        let (core, optional) = match union_shape(ctx.graph, ty) {
            Some(UnionShape::Nullable(member)) => (member, true),
            Some(UnionShape::Single(member)) => (member, optional),
            _ => (ty, optional),
        };
        if marshals_implicitly_from_dynamic(ctx.graph, core) {
            return Ok(expr);
        }
        let converted = self.convert_from(ctx, core, expr.clone())?;
        if optional {
            Ok(src![expr, ".nil? ? nil : ", converted])
        } else {
            Ok(converted)
        }
    }

    fn convert_from(&self, ctx: &RenderContext, ty: TypeId, expr: Source) -> RenderResult<Source> {
        let source = match ctx.graph.kind(ty) {
            TypeKind::Array { items } => src![
                expr,
                ".map { |x| ",
                self.from_dynamic_expr(ctx, *items, false, Source::from("x"))?,
                " }"
            ],
            TypeKind::Map { values } => {
                if marshals_implicitly_from_dynamic(ctx.graph, *values) {
                    src!["Types::Hash[", expr, "]"]
                } else {
                    src![
                        "Types::Hash[",
                        expr,
                        "].map { |k, v| [k, ",
                        self.from_dynamic_expr(ctx, *values, false, Source::from("v"))?,
                        "] }.to_h"
                    ]
                }
            }
            TypeKind::Class { .. } => {
                src![ctx.names.type_name(ty)?, ".from_dynamic(", expr, ")"]
            }
            TypeKind::Enum { .. } => {
                src!["Types::", ctx.names.type_name(ty)?, "[", expr, "]"]
            }
            TypeKind::Union { .. } => match union_shape(ctx.graph, ty) {
                Some(UnionShape::Explicit(_)) => {
                    src![ctx.names.type_name(ty)?, ".from_dynamic(", expr, ")"]
                }
                // Every other shape either marshals implicitly or was
                // unwrapped by the caller.
                _ => expr,
            },
            _ => expr,
        };
        Ok(source)
    }

    /// Convert a domain expression back into the JSON shape. The
    /// inverse of [`RubyTarget::from_dynamic_expr`]; a nullable value
    /// serializes through `to_dynamic` on both sides of the guard.
    fn to_dynamic_expr(
        &self,
        ctx: &RenderContext,
        ty: TypeId,
        optional: bool,
        expr: Source,
    ) -> RenderResult<Source> {
        let (core, optional) = match union_shape(ctx.graph, ty) {
            Some(UnionShape::Nullable(member)) => (member, true),
            Some(UnionShape::Single(member)) => (member, optional),
            _ => (ty, optional),
        };
        if marshals_implicitly_to_dynamic(ctx.graph, core) {
            return Ok(expr);
        }
        let converted = self.convert_to(ctx, core, expr.clone())?;
        if optional {
            Ok(src![expr, ".nil? ? nil : ", converted])
        } else {
            Ok(converted)
        }
    }

    fn convert_to(&self, ctx: &RenderContext, ty: TypeId, expr: Source) -> RenderResult<Source> {
        let source = match ctx.graph.kind(ty) {
            TypeKind::Array { items } => src![
                expr,
                ".map { |x| ",
                self.to_dynamic_expr(ctx, *items, false, Source::from("x"))?,
                " }"
            ],
            TypeKind::Map { values } => src![
                expr,
                ".map { |k, v| [k, ",
                self.to_dynamic_expr(ctx, *values, false, Source::from("v"))?,
                "] }.to_h"
            ],
            TypeKind::Class { .. } => src![expr, ".to_dynamic"],
            TypeKind::Union { .. } => match union_shape(ctx.graph, ty) {
                Some(UnionShape::Explicit(_)) => src![expr, ".to_dynamic"],
                _ => expr,
            },
            _ => expr,
        };
        Ok(source)
    }
}

/// Emit `if`/`elsif` branches, optionally closing with an `else` line.
fn emit_if_chain(
    out: &mut crate::source::Emitter,
    branches: Vec<(Source, Source)>,
    fallback: Option<&str>,
) -> RenderResult<()> {
    for (index, (test, body)) in branches.into_iter().enumerate() {
        let keyword = if index == 0 { "if " } else { "elsif " };
        out.emit_line(src![keyword, test]);
        out.indent(|out| {
            out.emit_line(body);
            Ok(())
        })?;
    }
    if let Some(fallback) = fallback {
        out.emit_line("else");
        out.indent(|out| {
            out.emit_line(fallback);
            Ok(())
        })?;
    }
    out.emit_line("end");
    Ok(())
}

/// Classify a union for rendering. Returns `None` for non-unions.
fn union_shape(graph: &TypeGraph, ty: TypeId) -> Option<UnionShape> {
    let TypeKind::Union { members, .. } = graph.kind(ty) else {
        return None;
    };
    let non_null: Vec<TypeId> = members
        .iter()
        .copied()
        .filter(|&m| !matches!(graph.kind(m), TypeKind::Null))
        .collect();
    let saw_null = non_null.len() != members.len();

    let shape = if non_null.is_empty() {
        UnionShape::NullOnly
    } else if non_null.len() == 1 && saw_null {
        UnionShape::Nullable(non_null[0])
    } else if non_null.len() == 1 {
        UnionShape::Single(non_null[0])
    } else if members_marshal_implicitly(graph, members) && guards_disjoint(graph, members) {
        UnionShape::Implicit(members.clone())
    } else {
        UnionShape::Explicit(members.clone())
    };
    Some(shape)
}

fn members_marshal_implicitly(graph: &TypeGraph, members: &[TypeId]) -> bool {
    members.iter().all(|&m| {
        marshals_implicitly_from_dynamic(graph, m) && marshals_implicitly_to_dynamic(graph, m)
    })
}

fn guards_disjoint(graph: &TypeGraph, members: &[TypeId]) -> bool {
    let mut seen = Vec::new();
    for &member in members {
        let Ok(guard) = value_guard(graph, member) else {
            return false;
        };
        if seen.contains(&guard) {
            return false;
        }
        seen.push(guard);
    }
    true
}

/// The JSON-level guard that recognizes values of `ty`.
fn value_guard(graph: &TypeGraph, ty: TypeId) -> RenderResult<Guard> {
    let guard = match graph.kind(ty) {
        TypeKind::Null => Guard::Null,
        TypeKind::Bool => Guard::Bool,
        TypeKind::Integer => Guard::Int,
        TypeKind::Double => Guard::Double,
        TypeKind::String | TypeKind::Enum { .. } => Guard::String,
        TypeKind::Array { .. } => Guard::Array,
        TypeKind::Class { .. } | TypeKind::Map { .. } => Guard::Object,
        // An unconstrained member matches every guard.
        TypeKind::Any => {
            return Err(RenderError::UnresolvableUnion { guard: "any" });
        }
        TypeKind::Union { .. } => {
            return Err(RenderError::UnresolvableUnion { guard: "union" });
        }
    };
    Ok(guard)
}

/// True when parsing `ty` from a JSON value is the identity.
fn marshals_implicitly_from_dynamic(graph: &TypeGraph, ty: TypeId) -> bool {
    match graph.kind(ty) {
        TypeKind::Any
        | TypeKind::Null
        | TypeKind::Bool
        | TypeKind::Integer
        | TypeKind::Double
        | TypeKind::String => true,
        TypeKind::Array { items } => marshals_implicitly_from_dynamic(graph, *items),
        // Parsing an enum runs the value-table lookup.
        TypeKind::Enum { .. } => false,
        TypeKind::Class { .. } | TypeKind::Map { .. } => false,
        TypeKind::Union { .. } => match union_shape(graph, ty) {
            Some(UnionShape::NullOnly) => true,
            Some(UnionShape::Single(member)) | Some(UnionShape::Nullable(member)) => {
                marshals_implicitly_from_dynamic(graph, member)
            }
            Some(UnionShape::Implicit(_)) => true,
            Some(UnionShape::Explicit(_)) => false,
            None => false,
        },
    }
}

/// True when serializing `ty` to a JSON value is the identity. Unlike
/// the parse direction, enums qualify (the stored value is already the
/// JSON string) and so do maps of implicitly-serializing values.
fn marshals_implicitly_to_dynamic(graph: &TypeGraph, ty: TypeId) -> bool {
    match graph.kind(ty) {
        TypeKind::Any
        | TypeKind::Null
        | TypeKind::Bool
        | TypeKind::Integer
        | TypeKind::Double
        | TypeKind::String
        | TypeKind::Enum { .. } => true,
        TypeKind::Array { items } => marshals_implicitly_to_dynamic(graph, *items),
        TypeKind::Map { values } => marshals_implicitly_to_dynamic(graph, *values),
        TypeKind::Class { .. } => false,
        TypeKind::Union { .. } => match union_shape(graph, ty) {
            Some(UnionShape::NullOnly) => true,
            Some(UnionShape::Single(member)) | Some(UnionShape::Nullable(member)) => {
                marshals_implicitly_to_dynamic(graph, member)
            }
            Some(UnionShape::Implicit(_)) => true,
            Some(UnionShape::Explicit(_)) => false,
            None => false,
        },
    }
}

/// Double-quoted Ruby string literal. Interpolation sigils are escaped
/// so case strings round-trip exactly.
fn string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for c in value.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '#' => literal.push_str("\\#"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            _ => literal.push(c),
        }
    }
    literal.push('"');
    literal
}
