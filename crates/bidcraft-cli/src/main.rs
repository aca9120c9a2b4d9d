//! Bidcraft CLI - cost learning for construction bids.

mod cli;
mod commands;
mod server;
mod workspace;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;
use workspace::Workspace;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = Workspace::resolve(cli.data_dir, cli.config).and_then(|ws| match cli.command {
        Commands::Correct {
            item,
            original,
            corrected,
        } => commands::correct::run(&ws, item, original, corrected),

        Commands::Delete { item } => commands::delete::run(&ws, item),

        Commands::Recompute => commands::recompute::run(&ws, cli.verbose),

        Commands::Suggest { json } => commands::suggest::run(&ws, json),

        Commands::Flagged { threshold, json } => commands::flagged::run(&ws, threshold, json),

        Commands::Status { json } => commands::status::run(&ws, json),

        Commands::Profile { action } => commands::profile::run(&ws, action),

        Commands::Export {
            file,
            output,
            format,
            project,
            contractor,
        } => commands::export::run(file, output, format, project, contractor, cli.verbose),

        Commands::Serve { port } => commands::serve::run(&ws, port),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
