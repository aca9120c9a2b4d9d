//! Recompute command - update remembered costs from the correction log.

use colored::Colorize;

use crate::workspace::Workspace;

pub fn run(ws: &Workspace, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = ws.open_store()?;
    let before = store.cost_memory().clone();

    let updated = store.recompute_cost_memory()?;

    if updated == 0 {
        println!(
            "{} No corrections logged yet. Use {} first.",
            "Note:".yellow(),
            "bidcraft correct".cyan()
        );
        return Ok(());
    }

    println!(
        "{} {} line item(s)",
        "Recomputed".cyan().bold(),
        updated.to_string().white().bold()
    );

    if verbose {
        for (item, cost) in store.cost_memory() {
            match before.get(item) {
                Some(old) if old != cost => println!("  {}: ${:.2} -> ${:.2}", item, old, cost),
                Some(_) => println!("  {}: ${:.2} (unchanged)", item, cost),
                None => println!("  {}: ${:.2} {}", item, cost, "(new)".green()),
            }
        }
    }

    Ok(())
}
