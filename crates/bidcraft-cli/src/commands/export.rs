//! Export command - price bid rows and write a bid document.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use colored::Colorize;

use bidcraft::{BidDocument, BidFormat};

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    format: BidFormat,
    project: Option<String>,
    contractor: Option<String>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("Rows file not found: {}", file.display()).into());
    }

    let input_format = if file.extension().map(|e| e == "tsv").unwrap_or(false) {
        BidFormat::Tsv
    } else {
        BidFormat::Csv
    };

    let stem = file.file_stem().unwrap_or_default().to_string_lossy().to_string();
    let rows = BidDocument::read_rows(File::open(&file)?, input_format)?;

    if rows.is_empty() {
        println!("{} No rows found in {}", "Warning:".yellow().bold(), file.display());
        return Ok(());
    }

    let mut bid = BidDocument::new(project.unwrap_or_else(|| stem.clone()));
    if let Some(contractor) = contractor {
        bid = bid.with_contractor(contractor);
    }
    for row in rows {
        if verbose {
            println!(
                "  {} {} {} @ ${:.2} = ${:.2}",
                row.description, row.quantity, row.unit, row.unit_price, row.total
            );
        }
        bid.push(row);
    }

    let output_path = output
        .unwrap_or_else(|| file.with_file_name(format!("{}_bid.{}", stem, format.extension())));

    let writer = BufWriter::new(File::create(&output_path)?);
    bid.export(writer, format)?;

    println!(
        "{} {} line item(s), subtotal ${:.2}",
        "Exported".green().bold(),
        bid.items.len().to_string().white().bold(),
        bid.subtotal()
    );
    println!("  Saved to {}", output_path.display().to_string().cyan());

    Ok(())
}
