//! The `generate` command: schema document in, source file out.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use typesmith_core::{render, RenderOptions, RubyTarget};

use crate::schema;

/// Render the schema at `input` for `lang` and write the generated
/// file under `output`. Returns the path written.
pub fn run(input: &str, lang: &str, output: &str, comments: Vec<String>) -> Result<PathBuf> {
    let graph = schema::load_graph(Path::new(input))?;

    let target = match lang {
        "ruby" => RubyTarget::new(),
        other => bail!("unsupported target language: {other}"),
    };
    let options = RenderOptions {
        leading_comments: comments,
        ..RenderOptions::default()
    };

    let file = render(&graph, &target, &options)
        .with_context(|| format!("rendering {input} for {lang} failed"))?;

    fs::create_dir_all(output)
        .with_context(|| format!("failed to create output directory {output}"))?;
    let path = Path::new(output).join(format!("{}.{}", file.file_stem, file.extension));
    fs::write(&path, file.text()).with_context(|| format!("failed to write {path:?}"))?;

    tracing::info!(path = %path.display(), lines = file.lines.len(), "generated");
    println!("Generated {}", path.display());
    Ok(path)
}
