//! Bidcraft: cost learning for construction bid estimation.
//!
//! Estimators correct line item prices and delete line items that do not
//! fit their work. Bidcraft remembers those corrections, smooths each line
//! item's remembered cost toward what estimators actually charge, and stops
//! suggesting items that keep getting deleted.
//!
//! # Core Principles
//!
//! - **Append-only history**: corrections and deletions are logged, never removed
//! - **Explicit learning**: remembered costs change only when a recompute is requested
//! - **Durable by default**: every mutation is written through before it returns
//!
//! # Example
//!
//! ```no_run
//! use bidcraft::{CostLearningStore, JsonFileStore};
//!
//! let mut store = CostLearningStore::open(JsonFileStore::new("data")).unwrap();
//! store.record_correction("Drywall Install", 500.0, 600.0).unwrap();
//! store.recompute_cost_memory().unwrap();
//!
//! for suggestion in store.suggest_line_items() {
//!     println!("{}: ${}", suggestion.item, suggestion.suggested_cost);
//! }
//! ```

pub mod bid;
pub mod config;
pub mod error;
pub mod learning;
pub mod persistence;
pub mod profile;

pub use bid::{BidDocument, BidFormat, BidLineItem};
pub use config::LearningConfig;
pub use error::{BidcraftError, Result};
pub use learning::{CorrectionRecord, CostLearningStore, LearningSummary, LineItemSuggestion};
pub use persistence::{DocumentKind, DocumentStore, JsonFileStore, MemoryStore};
pub use profile::{ContractorProfile, ProfileRegistry, Specialty};
