//! Blueprint CLI: the `blueprint` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);
    let config = support::load_config_or_exit(cli.config.as_deref());

    match cli.command {
        Commands::Render {
            project,
            unit,
            format,
            write,
        } => commands::render::run(config, project, unit, format.into(), write),

        Commands::Index {
            project,
            collection,
            format,
            write,
        } => commands::index::run(config, project, collection, format.into(), write),

        Commands::Nodes { project } => commands::nodes::run(config, project),

        Commands::Check { project, json } => commands::check::run(config, project, json),
    }
}

/// Log to stderr so stdout stays machine-readable.
fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("BLUEPRINT_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
