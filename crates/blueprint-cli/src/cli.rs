use blueprint_doc::Format;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "blueprint",
    about = "Blueprint: dependency-tracked LaTeX documents from verified declarations",
    version
)]
pub struct Cli {
    /// Path to blueprint.toml (defaults to ./blueprint.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log at debug level (overrides BLUEPRINT_LOG / RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render one unit's document
    Render {
        /// Path to the project snapshot JSON
        #[arg(long)]
        project: PathBuf,

        /// Unit to render
        #[arg(long)]
        unit: String,

        /// Output format
        #[arg(long, value_enum, default_value = "tex")]
        format: FormatArg,

        /// Write under the output root instead of printing
        #[arg(long)]
        write: bool,
    },

    /// Render a collection index
    Index {
        /// Path to the project snapshot JSON
        #[arg(long)]
        project: PathBuf,

        /// Collection to render
        #[arg(long)]
        collection: String,

        /// Output format
        #[arg(long, value_enum, default_value = "tex")]
        format: FormatArg,

        /// Also render every unit of the collection and write all of them
        #[arg(long)]
        write: bool,
    },

    /// Print every node as JSON, dependencies first
    Nodes {
        /// Path to the project snapshot JSON
        #[arg(long)]
        project: PathBuf,
    },

    /// Register every unit and report failures
    Check {
        /// Path to the project snapshot JSON
        #[arg(long)]
        project: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Tex,
    Json,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Tex => Format::Tex,
            FormatArg::Json => Format::Json,
        }
    }
}
