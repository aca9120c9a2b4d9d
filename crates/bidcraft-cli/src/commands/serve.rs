//! Serve command - expose the learning store over HTTP.

use colored::Colorize;

use crate::server::{app, state::AppState};
use crate::workspace::Workspace;

pub fn run(ws: &Workspace, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let store = ws.open_store()?;
    let profiles = ws.open_profiles()?;
    let summary = store.summary();

    let state = AppState::new(store, profiles);

    let url = format!("http://localhost:{}", port);
    println!();
    println!(
        "{} {}",
        "Starting learning server at".cyan().bold(),
        url.white().bold()
    );
    println!();
    println!("  Data:        {}", ws.data_dir.display());
    println!("  Learned:     {}", summary.learned_items);
    println!("  Flagged:     {}", summary.flagged_items);
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(app::run_server(state, port))?;

    println!("{}", "Shutting down...".yellow());
    Ok(())
}
