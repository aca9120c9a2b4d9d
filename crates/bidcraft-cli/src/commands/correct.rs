//! Correct command - log a price correction for a line item.

use colored::Colorize;

use crate::workspace::Workspace;

pub fn run(
    ws: &Workspace,
    item: String,
    original: f64,
    corrected: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = ws.open_store()?;
    let record = store.record_correction(&item, original, corrected)?;

    let adjustment = if record.adjustment >= 0.0 {
        format!("+{:.2}", record.adjustment).red()
    } else {
        format!("{:.2}", record.adjustment).green()
    };

    println!(
        "{} correction for {} (${:.2} -> ${:.2}, {})",
        "Logged".green().bold(),
        item.white().bold(),
        record.original_cost,
        record.corrected_cost,
        adjustment
    );
    println!(
        "  {} correction(s) on record. Run {} to update suggestions.",
        store.corrections_for(&item).len(),
        "bidcraft recompute".cyan()
    );

    Ok(())
}
