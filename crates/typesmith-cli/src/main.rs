//! typesmith CLI - Generate typed source files from a schema IR
//!
//! Commands:
//! - `typesmith generate` - Render a schema document to a source file
//! - `typesmith check` - Validate a schema document

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use typesmith_cli::{generate, schema};

#[derive(Parser)]
#[command(name = "typesmith")]
#[command(author, version, about = "Generate typed source files from a schema IR", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a schema document to a source file
    Generate {
        /// Path to the schema-IR JSON document
        #[arg(short, long)]
        input: String,

        /// Target language (ruby)
        #[arg(short, long, default_value = "ruby")]
        lang: String,

        /// Output directory for the generated file
        #[arg(short, long)]
        output: String,

        /// Leading comment line; repeat for a multi-line block
        #[arg(short, long = "comment")]
        comment: Vec<String>,
    },

    /// Validate a schema document
    Check {
        /// Path to the schema-IR JSON document
        #[arg(short, long)]
        input: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            lang,
            output,
            comment,
        } => {
            generate::run(&input, &lang, &output, comment)?;
        }
        Commands::Check { input } => {
            schema::check(&input)?;
        }
    }

    Ok(())
}
