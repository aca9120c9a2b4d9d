//! Cost-memory learning and flagging.
//!
//! Estimators correct line item prices and delete line items that do not
//! belong in their bids. Both events are logged. On request, each corrected
//! item's remembered cost is pulled toward the average of its corrections by
//! exponential smoothing, and items deleted too often are flagged and left
//! out of suggestions.
//!
//! # Usage
//!
//! ```no_run
//! use bidcraft::learning::CostLearningStore;
//! use bidcraft::persistence::JsonFileStore;
//!
//! let mut store = CostLearningStore::open(JsonFileStore::new("data")).unwrap();
//!
//! store.record_correction("Drywall Install", 500.0, 600.0).unwrap();
//! store.record_deletion("Temporary Fencing").unwrap();
//! store.recompute_cost_memory().unwrap();
//!
//! for suggestion in store.suggest_line_items() {
//!     println!("{}: ${}", suggestion.item, suggestion.suggested_cost);
//! }
//! ```

mod record;
mod store;

pub use record::{CorrectionLog, CorrectionRecord, CostMemory, DeletionLog, LineItemSuggestion};
pub use store::{CostLearningStore, LearningSummary};
