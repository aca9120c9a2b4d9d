//! Delete command - log that a line item was removed from a bid.

use colored::Colorize;

use crate::workspace::Workspace;

pub fn run(ws: &Workspace, item: String) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = ws.open_store()?;
    let count = store.record_deletion(&item)?;
    let threshold = store.config().flag_threshold;

    println!(
        "{} {} as deleted ({} of {})",
        "Marked".green().bold(),
        item.white().bold(),
        count,
        threshold
    );

    if count == threshold {
        println!(
            "{} {} is now flagged and will no longer be suggested.",
            "Note:".yellow(),
            item
        );
    } else if count > threshold {
        println!("  Already flagged.");
    }

    Ok(())
}
