//! Schema-IR document parsing.
//!
//! The CLI consumes a JSON document describing the type graph: an
//! arena-ordered `types` array (references are indices into it) plus
//! the `topLevels` entry points. Parsing and validation happen here;
//! the renderer core only ever sees a checked [`TypeGraph`].

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use typesmith_core::graph::ClassProperty;
use typesmith_core::{TypeGraph, TypeGraphBuilder, TypeId};

/// Root of a schema-IR document.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDoc {
    #[serde(default)]
    pub types: Vec<TypeDecl>,

    #[serde(default, rename = "topLevels")]
    pub top_levels: Vec<TopLevelDecl>,
}

/// One node of the `types` arena.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeDecl {
    Any,
    Null,
    Bool,
    Integer,
    Double,
    String,
    Array {
        items: usize,
    },
    Class {
        name: String,
        properties: Vec<PropertyDecl>,
        #[serde(default)]
        description: Option<Vec<String>>,
    },
    Map {
        values: usize,
    },
    Enum {
        name: String,
        cases: Vec<String>,
        #[serde(default)]
        description: Option<Vec<String>>,
    },
    Union {
        name: String,
        members: Vec<usize>,
        #[serde(default)]
        description: Option<Vec<String>>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyDecl {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: usize,

    #[serde(default)]
    pub optional: bool,

    #[serde(default)]
    pub description: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TopLevelDecl {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: usize,
}

/// Read and validate a schema document from disk.
pub fn load_graph(path: &Path) -> Result<TypeGraph> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path:?}"))?;
    parse_document(&content).with_context(|| format!("invalid schema document {path:?}"))
}

/// Parse and validate a schema document.
pub fn parse_document(source: &str) -> Result<TypeGraph> {
    let doc: SchemaDoc =
        serde_json::from_str(source).context("schema document is not well-formed JSON")?;
    build_graph(doc)
}

fn build_graph(doc: SchemaDoc) -> Result<TypeGraph> {
    let mut builder = TypeGraphBuilder::new();
    for decl in doc.types {
        match decl {
            TypeDecl::Any => {
                builder.add_any();
            }
            TypeDecl::Null => {
                builder.add_null();
            }
            TypeDecl::Bool => {
                builder.add_bool();
            }
            TypeDecl::Integer => {
                builder.add_integer();
            }
            TypeDecl::Double => {
                builder.add_double();
            }
            TypeDecl::String => {
                builder.add_string();
            }
            TypeDecl::Array { items } => {
                builder.add_array(TypeId::new(items));
            }
            TypeDecl::Class {
                name,
                properties,
                description,
            } => {
                let properties = properties
                    .into_iter()
                    .map(|p| ClassProperty {
                        json_name: p.name,
                        ty: TypeId::new(p.ty),
                        optional: p.optional,
                        description: p.description.unwrap_or_default(),
                    })
                    .collect();
                let id = builder.add_class(name, properties);
                if let Some(lines) = description {
                    builder.set_description(id, lines);
                }
            }
            TypeDecl::Map { values } => {
                builder.add_map(TypeId::new(values));
            }
            TypeDecl::Enum {
                name,
                cases,
                description,
            } => {
                let id = builder.add_enum(name, cases);
                if let Some(lines) = description {
                    builder.set_description(id, lines);
                }
            }
            TypeDecl::Union {
                name,
                members,
                description,
            } => {
                let members = members.into_iter().map(TypeId::new).collect();
                let id = builder.add_union(name, members);
                if let Some(lines) = description {
                    builder.set_description(id, lines);
                }
            }
        }
    }
    for top_level in doc.top_levels {
        builder.add_top_level(top_level.name, TypeId::new(top_level.ty));
    }
    builder.finish().context("schema document failed validation")
}

/// Validate a schema document and report a summary.
pub fn check(input: &str) -> Result<()> {
    let graph = load_graph(Path::new(input))?;
    println!(
        "ok: {} types, {} top-level entry points",
        graph.len(),
        graph.top_levels().len()
    );
    Ok(())
}

#[cfg(test)]
#[path = "schema/schema_tests.rs"]
mod schema_tests;
