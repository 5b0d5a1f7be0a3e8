//! typesmith-core - Renderer core for schema-driven code generation
//!
//! This crate turns an immutable [`TypeGraph`] (a graph of named and
//! structural types) into an in-memory stream of source lines for a
//! target language, with bidirectional converters between the
//! generated declarations and a JSON-shaped value model:
//! - [`TypeGraph`] and [`TypeGraphBuilder`] for the input IR
//! - [`NameArena`] for collision-free, style-correct identifiers
//! - [`Source`] and [`Emitter`] for rope-based, lazily-resolved output
//! - [`Target`] for the per-language hook set
//! - [`render`] to drive a full pass
//!
//! The core performs no I/O; a thin driver writes the returned
//! [`RenderedFile`] to disk.

pub mod error;
pub mod graph;
pub mod namer;
pub mod naming;
pub mod options;
pub mod render;
pub mod source;
pub mod targets;

pub use error::{RenderError, RenderResult};
pub use graph::{ClassProperty, TopLevel, TypeGraph, TypeGraphBuilder, TypeId, TypeKind, TypeNode};
pub use namer::{ForbiddenWords, NameArena, NameId, NamespaceId};
pub use options::RenderOptions;
pub use render::{render, NameStyle, RenderContext, RenderedFile, Target};
pub use source::{Annotation, BlankLinePolicy, Emitter, Source};
pub use targets::RubyTarget;
