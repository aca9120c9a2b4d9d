//! Flagged command - list line items hidden from suggestions.

use colored::Colorize;

use crate::workspace::Workspace;

pub fn run(
    ws: &Workspace,
    threshold: Option<u64>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = ws.open_store()?;
    let threshold = threshold.unwrap_or(store.config().flag_threshold);
    let flagged = store.flagged_items_at(threshold);

    if json_output {
        let items: Vec<_> = flagged
            .iter()
            .map(|item| {
                serde_json::json!({
                    "item": item,
                    "deletions": store.deletion_count(item),
                })
            })
            .collect();
        let output = serde_json::json!({
            "threshold": threshold,
            "flagged": items,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if flagged.is_empty() {
        println!("No line items deleted {} or more times.", threshold);
        return Ok(());
    }

    println!(
        "{} (deleted {} or more times)",
        "Flagged Line Items".red().bold(),
        threshold
    );
    for item in &flagged {
        println!("  {} ({} deletions)", item.white(), store.deletion_count(item));
    }

    Ok(())
}
