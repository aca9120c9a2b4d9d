//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use bidcraft::{BidFormat, Specialty};

/// Bidcraft: cost learning for construction bids
#[derive(Parser)]
#[command(name = "bidcraft")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding cost memory, correction, deletion and profile documents
    #[arg(long, global = true, env = "BIDCRAFT_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Learning configuration file (default: <data-dir>/bidcraft.toml if present)
    #[arg(long, global = true, env = "BIDCRAFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log a price correction for a line item
    Correct {
        /// Line item name (e.g., "Drywall Install")
        #[arg(value_name = "ITEM")]
        item: String,

        /// Cost the estimate originally carried
        #[arg(long)]
        original: f64,

        /// Cost it was corrected to
        #[arg(long)]
        corrected: f64,
    },

    /// Log that a line item was deleted from a bid
    Delete {
        /// Line item name
        #[arg(value_name = "ITEM")]
        item: String,
    },

    /// Update remembered costs from the correction log
    Recompute,

    /// List suggested line items and their remembered costs
    Suggest {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List line items hidden because they keep being deleted
    Flagged {
        /// Deletion count at which an item is flagged (default: from config)
        #[arg(short, long)]
        threshold: Option<u64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show what has been learned so far
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage general contractor profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Export bid rows as a priced bid document
    Export {
        /// Rows file (CSV/TSV with description, quantity, unit, unit_price)
        #[arg(value_name = "ROWS_FILE")]
        file: PathBuf,

        /// Output path (default: <file>_bid.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "tsv")]
        format: BidFormat,

        /// Project name (default: rows file name)
        #[arg(long)]
        project: Option<String>,

        /// Contractor submitting the bid
        #[arg(long)]
        contractor: Option<String>,
    },

    /// Serve the learning API over HTTP
    Serve {
        /// Port for web server
        #[arg(short, long, default_value = "3141")]
        port: u16,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Save or replace a contractor profile
    Save {
        /// Company name
        #[arg(value_name = "NAME")]
        name: String,

        /// Trade specialty (concrete, framing, drywall, paint, general)
        #[arg(short, long, default_value = "general")]
        specialty: Specialty,

        /// License number
        #[arg(long, default_value = "")]
        license: String,

        /// Operating region
        #[arg(long, default_value = "")]
        region: String,
    },

    /// List saved profiles
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
