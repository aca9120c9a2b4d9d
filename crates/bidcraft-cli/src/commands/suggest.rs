//! Suggest command - list remembered costs for unflagged line items.

use colored::Colorize;

use crate::workspace::Workspace;

pub fn run(ws: &Workspace, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = ws.open_store()?;
    let suggestions = store.suggest_line_items();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    if suggestions.is_empty() {
        println!(
            "No suggestions yet. Log corrections with {} and run {}.",
            "bidcraft correct".cyan(),
            "bidcraft recompute".cyan()
        );
        return Ok(());
    }

    println!("{}", "Suggested Line Items:".yellow().bold());
    for suggestion in &suggestions {
        println!(
            "  {} - ${:.2}",
            suggestion.item.white().bold(),
            suggestion.suggested_cost
        );
    }

    Ok(())
}
