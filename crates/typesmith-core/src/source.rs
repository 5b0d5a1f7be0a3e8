//! Source rope and emit engine.
//!
//! Generated code is assembled as a rope: a tree of literal strings,
//! unresolved name handles, and nested sequences. The [`Emitter`]
//! collects rope fragments line by line under an indentation stack and
//! only resolves name handles when [`Emitter::finish`] runs, after the
//! name arena has sealed. Resolving earlier would read names that a
//! later namespace could still shadow.

use serde::{Deserialize, Serialize};

use crate::error::RenderResult;
use crate::namer::{NameArena, NameId};

/// Diagnostic marker attached to a fragment; materializes as a
/// trailing comment on the emitted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Annotation {
    /// The schema gave no evidence beyond "any value".
    AnyType,
    /// The only observed value was null.
    NullOnly,
}

impl Annotation {
    pub fn message(self) -> &'static str {
        match self {
            Annotation::AnyType => "unconstrained type",
            Annotation::NullOnly => "only null observed",
        }
    }
}

/// A rope fragment: literal text, a deferred name, a sequence, or an
/// annotated span.
#[derive(Debug, Clone)]
pub enum Source {
    Text(String),
    Name(NameId),
    Sequence(Vec<Source>),
    Annotated(Annotation, Box<Source>),
}

impl Source {
    pub fn annotated(annotation: Annotation, inner: impl Into<Source>) -> Source {
        Source::Annotated(annotation, Box::new(inner.into()))
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Source {
        Source::Text(s.to_string())
    }
}

impl From<String> for Source {
    fn from(s: String) -> Source {
        Source::Text(s)
    }
}

impl From<NameId> for Source {
    fn from(n: NameId) -> Source {
        Source::Name(n)
    }
}

impl From<Vec<Source>> for Source {
    fn from(parts: Vec<Source>) -> Source {
        Source::Sequence(parts)
    }
}

/// Assemble a [`Source::Sequence`] from heterogeneous fragments.
///
/// ```ignore
/// ctx.out.emit_line(src!["attribute :", name, ", ", type_expr]);
/// ```
#[macro_export]
macro_rules! src {
    ($($part:expr),* $(,)?) => {
        $crate::source::Source::Sequence(vec![$($crate::source::Source::from($part)),*])
    };
}

/// Blank-line separation between named types in the rendered body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlankLinePolicy {
    /// No separator lines.
    None,
    /// Blank line before each item.
    Leading,
    /// Blank before the first item and between consecutive items.
    LeadingAndInterposing,
}

#[derive(Debug)]
enum Item {
    Line { indent: usize, source: Source },
    Blank,
    Table { indent: usize, rows: Vec<Vec<Source>> },
}

/// Append-only line collector with an indentation stack and deferred
/// name resolution.
#[derive(Debug)]
pub struct Emitter {
    indent_unit: String,
    comment_prefix: String,
    indent: usize,
    items: Vec<Item>,
}

impl Emitter {
    pub fn new(indent_unit: &str, comment_prefix: &str) -> Emitter {
        Emitter {
            indent_unit: indent_unit.to_string(),
            comment_prefix: comment_prefix.to_string(),
            indent: 0,
            items: Vec::new(),
        }
    }

    /// Emit one line at the current indentation.
    pub fn emit_line(&mut self, source: impl Into<Source>) {
        self.items.push(Item::Line {
            indent: self.indent,
            source: source.into(),
        });
    }

    /// Emit an unconditional blank line.
    pub fn blank_line(&mut self) {
        self.items.push(Item::Blank);
    }

    /// Emit a blank line unless the previous line is already blank
    /// (or nothing has been emitted yet).
    pub fn ensure_blank_line(&mut self) {
        if !self.last_is_blank() {
            self.items.push(Item::Blank);
        }
    }

    fn last_is_blank(&self) -> bool {
        match self.items.last() {
            None => true,
            Some(Item::Blank) => true,
            Some(_) => false,
        }
    }

    /// Run `f` one indentation level deeper.
    pub fn indent(
        &mut self,
        f: impl FnOnce(&mut Emitter) -> RenderResult<()>,
    ) -> RenderResult<()> {
        self.indent += 1;
        let result = f(self);
        self.indent -= 1;
        result
    }

    /// `header`, indented body, `footer`. Used for every scoped
    /// construct.
    pub fn emit_block(
        &mut self,
        header: impl Into<Source>,
        f: impl FnOnce(&mut Emitter) -> RenderResult<()>,
        footer: impl Into<Source>,
    ) -> RenderResult<()> {
        self.emit_line(header);
        self.indent(f)?;
        self.emit_line(footer);
        Ok(())
    }

    /// Emit rows as columns aligned to the widest cell per column.
    /// Alignment is computed after name resolution.
    pub fn emit_table(&mut self, rows: Vec<Vec<Source>>) {
        if rows.is_empty() {
            return;
        }
        self.items.push(Item::Table {
            indent: self.indent,
            rows,
        });
    }

    /// Emit a line-comment block in the target's style.
    pub fn emit_comment_lines(&mut self, lines: &[String]) {
        for line in lines {
            if line.is_empty() {
                self.emit_line(Source::Text(self.comment_prefix.clone()));
            } else {
                self.emit_line(Source::Text(format!("{} {line}", self.comment_prefix)));
            }
        }
    }

    /// Resolve every deferred name against the sealed arena and
    /// produce the final line stream.
    pub fn finish(self, arena: &NameArena) -> RenderResult<Vec<String>> {
        let mut lines = Vec::with_capacity(self.items.len());
        for item in &self.items {
            match item {
                Item::Blank => lines.push(String::new()),
                Item::Line { indent, source } => {
                    let mut text = self.indent_unit.repeat(*indent);
                    let mut notes = Vec::new();
                    flatten(source, arena, &mut text, &mut notes)?;
                    self.append_notes(&mut text, &notes);
                    lines.push(trim_end(text));
                }
                Item::Table { indent, rows } => {
                    let mut resolved: Vec<Vec<(String, Vec<Annotation>)>> = Vec::new();
                    let mut widths: Vec<usize> = Vec::new();
                    for row in rows {
                        let mut cells = Vec::with_capacity(row.len());
                        for (column, cell) in row.iter().enumerate() {
                            let mut text = String::new();
                            let mut notes = Vec::new();
                            flatten(cell, arena, &mut text, &mut notes)?;
                            let width = text.chars().count();
                            if column >= widths.len() {
                                widths.push(width);
                            } else if widths[column] < width {
                                widths[column] = width;
                            }
                            cells.push((text, notes));
                        }
                        resolved.push(cells);
                    }
                    for cells in resolved {
                        let mut text = self.indent_unit.repeat(*indent);
                        let mut notes = Vec::new();
                        let last = cells.len().saturating_sub(1);
                        for (column, (cell, cell_notes)) in cells.into_iter().enumerate() {
                            let width = cell.chars().count();
                            text.push_str(&cell);
                            if column < last {
                                for _ in width..widths[column] {
                                    text.push(' ');
                                }
                                text.push(' ');
                            }
                            notes.extend(cell_notes);
                        }
                        self.append_notes(&mut text, &notes);
                        lines.push(trim_end(text));
                    }
                }
            }
        }
        Ok(lines)
    }

    fn append_notes(&self, text: &mut String, notes: &[Annotation]) {
        for note in notes {
            text.push(' ');
            text.push_str(&self.comment_prefix);
            text.push(' ');
            text.push_str(note.message());
        }
    }
}

fn flatten(
    source: &Source,
    arena: &NameArena,
    out: &mut String,
    notes: &mut Vec<Annotation>,
) -> RenderResult<()> {
    match source {
        Source::Text(text) => out.push_str(text),
        Source::Name(id) => out.push_str(arena.resolved(*id)?),
        Source::Sequence(parts) => {
            for part in parts {
                flatten(part, arena, out, notes)?;
            }
        }
        Source::Annotated(annotation, inner) => {
            notes.push(*annotation);
            flatten(inner, arena, out, notes)?;
        }
    }
    Ok(())
}

fn trim_end(text: String) -> String {
    let trimmed = text.trim_end();
    if trimmed.len() == text.len() {
        text
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
#[path = "source/source_tests.rs"]
mod source_tests;
