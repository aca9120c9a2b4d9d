//! Status command - show what has been learned so far.

use colored::Colorize;

use crate::workspace::Workspace;

pub fn run(ws: &Workspace, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = ws.open_store()?;
    let summary = store.summary();

    if json_output {
        let status = serde_json::json!({
            "data_dir": ws.data_dir.display().to_string(),
            "config": store.config(),
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Learning status for".cyan().bold(),
        ws.data_dir.display().to_string().white()
    );
    println!();

    println!("{}", "Corrections:".yellow().bold());
    println!("  Line items: {}", summary.corrected_items.to_string().white());
    println!("  Logged:     {}", summary.total_corrections.to_string().white());
    println!();

    println!("{}", "Cost memory:".yellow().bold());
    println!("  Learned:    {}", summary.learned_items.to_string().white());
    println!("  Suggested:  {}", summary.suggestions.to_string().green());
    println!();

    println!("{}", "Deletions:".yellow().bold());
    println!("  Line items: {}", summary.deleted_items.to_string().white());
    println!(
        "  Flagged:    {} (threshold {})",
        summary.flagged_items.to_string().red(),
        summary.flag_threshold
    );
    println!();

    // Next steps
    if summary.corrected_items > summary.learned_items {
        println!(
            "Some corrected items have no remembered cost yet. Run {} to learn them.",
            "bidcraft recompute".cyan().bold()
        );
    } else if summary.total_corrections == 0 {
        println!(
            "Run {} to start teaching costs.",
            "bidcraft correct <ITEM> --original <N> --corrected <N>".cyan().bold()
        );
    }

    Ok(())
}
