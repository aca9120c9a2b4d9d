//! Bid documents: ordered line item rows and their export.
//!
//! A bid is independent of the learning store. The estimator assembles rows
//! (possibly using suggested costs), and the finished document is written out
//! as TSV, CSV, or JSON.

use std::io::{Read, Write};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{BidcraftError, Result};

/// One priced row of a bid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidLineItem {
    pub description: String,
    pub quantity: f64,
    pub unit: String,
    pub unit_price: f64,
    /// `quantity * unit_price`, rounded to cents.
    pub total: f64,
}

impl BidLineItem {
    /// Create a row, computing its total.
    pub fn new(
        description: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
        unit_price: f64,
    ) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit: unit.into(),
            unit_price,
            total: round_cents(quantity * unit_price),
        }
    }
}

/// Input row shape: the total is always recomputed.
#[derive(Debug, Deserialize)]
struct RawRow {
    description: String,
    quantity: f64,
    #[serde(default)]
    unit: String,
    unit_price: f64,
}

/// Output format for an exported bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BidFormat {
    #[default]
    Tsv,
    Csv,
    Json,
}

impl BidFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            BidFormat::Tsv => "tsv",
            BidFormat::Csv => "csv",
            BidFormat::Json => "json",
        }
    }

    fn delimiter(&self) -> u8 {
        match self {
            BidFormat::Csv => b',',
            _ => b'\t',
        }
    }
}

impl std::str::FromStr for BidFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(BidFormat::Tsv),
            "csv" => Ok(BidFormat::Csv),
            "json" => Ok(BidFormat::Json),
            _ => Err(format!("Unknown format: {}. Use tsv, csv, or json.", s)),
        }
    }
}

impl std::fmt::Display for BidFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// A finished bid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidDocument {
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contractor: Option<String>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<BidLineItem>,
}

impl BidDocument {
    /// Create an empty bid for a project.
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            contractor: None,
            created_at: Utc::now(),
            items: Vec::new(),
        }
    }

    /// Set the contractor submitting the bid.
    pub fn with_contractor(mut self, contractor: impl Into<String>) -> Self {
        self.contractor = Some(contractor.into());
        self
    }

    /// Append a row.
    pub fn push(&mut self, item: BidLineItem) {
        self.items.push(item);
    }

    /// Sum of all row totals.
    pub fn subtotal(&self) -> f64 {
        round_cents(self.items.iter().map(|i| i.total).sum())
    }

    /// Read rows from delimited text with a
    /// `description,quantity,unit,unit_price` header.
    pub fn read_rows<R: Read>(reader: R, format: BidFormat) -> Result<Vec<BidLineItem>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(format.delimiter())
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (idx, result) in reader.deserialize::<RawRow>().enumerate() {
            let raw = result?;
            if raw.description.is_empty() {
                return Err(BidcraftError::Parse {
                    row: idx + 1,
                    message: "description is empty".to_string(),
                });
            }
            if !raw.quantity.is_finite() || !raw.unit_price.is_finite() {
                return Err(BidcraftError::Parse {
                    row: idx + 1,
                    message: "quantity and unit_price must be finite".to_string(),
                });
            }
            rows.push(BidLineItem::new(
                raw.description,
                raw.quantity,
                raw.unit,
                raw.unit_price,
            ));
        }

        Ok(rows)
    }

    /// Write the bid in `format`.
    pub fn export<W: Write>(&self, writer: W, format: BidFormat) -> Result<()> {
        match format {
            BidFormat::Json => {
                serde_json::to_writer_pretty(writer, self)?;
            }
            BidFormat::Tsv | BidFormat::Csv => {
                let mut out = csv::WriterBuilder::new()
                    .delimiter(format.delimiter())
                    .from_writer(writer);
                for item in &self.items {
                    out.serialize(item)?;
                }
                out.flush().map_err(|e| BidcraftError::Write {
                    target: "bid export",
                    source: e,
                })?;
            }
        }
        Ok(())
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
