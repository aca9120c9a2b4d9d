//! The cost-learning store: remembered costs, corrections, and deletions.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::LearningConfig;
use crate::error::{ensure_named, BidcraftError, Result};
use crate::persistence::{load_document, save_document, DocumentKind, DocumentStore};

use super::record::{CorrectionLog, CorrectionRecord, CostMemory, DeletionLog, LineItemSuggestion};

/// Counts describing what the store has learned so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningSummary {
    /// Items with a remembered cost.
    pub learned_items: usize,
    /// Items with at least one correction.
    pub corrected_items: usize,
    /// Corrections across all items.
    pub total_corrections: usize,
    /// Items deleted at least once.
    pub deleted_items: usize,
    /// Items at or above the flag threshold.
    pub flagged_items: usize,
    /// Items currently offered as suggestions.
    pub suggestions: usize,
    /// Threshold used for the flag count.
    pub flag_threshold: u64,
}

/// Per-line-item cost memory learned from user corrections.
///
/// The store owns its three logs and writes each one back through the
/// injected [`DocumentStore`] after every mutation. A mutation whose write
/// fails is rolled back, so memory never runs ahead of storage.
///
/// # Example
///
/// ```
/// use bidcraft::learning::CostLearningStore;
/// use bidcraft::persistence::MemoryStore;
///
/// let mut store = CostLearningStore::open(MemoryStore::new()).unwrap();
/// store.record_correction("Drywall Install", 500.0, 600.0).unwrap();
/// store.recompute_cost_memory().unwrap();
///
/// assert_eq!(store.remembered_cost("Drywall Install"), Some(600.0));
/// ```
pub struct CostLearningStore {
    config: LearningConfig,
    backend: Box<dyn DocumentStore>,
    cost_memory: CostMemory,
    correction_log: CorrectionLog,
    deletion_log: DeletionLog,
}

impl std::fmt::Debug for CostLearningStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CostLearningStore")
            .field("config", &self.config)
            .field("backend", &self.backend.name())
            .field("cost_memory", &self.cost_memory.len())
            .field("correction_log", &self.correction_log.len())
            .field("deletion_log", &self.deletion_log.len())
            .finish()
    }
}

impl CostLearningStore {
    /// Open a store with the default configuration.
    pub fn open(backend: impl DocumentStore + 'static) -> Result<Self> {
        Self::with_config(backend, LearningConfig::default())
    }

    /// Open a store, loading all three logs from `backend`.
    pub fn with_config(backend: impl DocumentStore + 'static, config: LearningConfig) -> Result<Self> {
        Self::from_boxed(Box::new(backend), config)
    }

    /// Open a store over an already boxed backend.
    pub fn from_boxed(backend: Box<dyn DocumentStore>, config: LearningConfig) -> Result<Self> {
        config.validate()?;

        let cost_memory: CostMemory = load_document(backend.as_ref(), DocumentKind::CostMemory)?;
        let correction_log: CorrectionLog =
            load_document(backend.as_ref(), DocumentKind::CorrectionLog)?;
        let deletion_log: DeletionLog = load_document(backend.as_ref(), DocumentKind::DeletionLog)?;

        debug!(
            store = backend.name(),
            learned = cost_memory.len(),
            corrected = correction_log.len(),
            deleted = deletion_log.len(),
            "cost-learning store opened"
        );

        Ok(Self {
            config,
            backend,
            cost_memory,
            correction_log,
            deletion_log,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    /// Log a price correction for `item`.
    ///
    /// The record is appended after any earlier corrections for the same
    /// item and the whole correction log is persisted.
    pub fn record_correction(
        &mut self,
        item: &str,
        original_cost: f64,
        corrected_cost: f64,
    ) -> Result<CorrectionRecord> {
        validate_item_name(item)?;
        validate_cost("original cost", original_cost)?;
        validate_cost("corrected cost", corrected_cost)?;

        let record = CorrectionRecord::new(original_cost, corrected_cost);
        let is_new_item = !self.correction_log.contains_key(item);
        self.correction_log
            .entry(item.to_string())
            .or_default()
            .push(record.clone());

        if let Err(e) = save_document(
            self.backend.as_ref(),
            DocumentKind::CorrectionLog,
            &self.correction_log,
        ) {
            if is_new_item {
                self.correction_log.shift_remove(item);
            } else if let Some(records) = self.correction_log.get_mut(item) {
                records.pop();
            }
            return Err(e);
        }

        debug!(item, adjustment = record.adjustment, "correction logged");
        Ok(record)
    }

    /// Log that `item` was deleted from a bid. Returns the new count.
    pub fn record_deletion(&mut self, item: &str) -> Result<u64> {
        validate_item_name(item)?;

        let previous = self.deletion_log.get(item).copied();
        let count = previous.unwrap_or(0).checked_add(1).ok_or_else(|| {
            BidcraftError::Persistence(format!("Deletion count for '{}' is at its maximum", item))
        })?;
        self.deletion_log.insert(item.to_string(), count);

        if let Err(e) = save_document(
            self.backend.as_ref(),
            DocumentKind::DeletionLog,
            &self.deletion_log,
        ) {
            match previous {
                Some(prev) => {
                    self.deletion_log.insert(item.to_string(), prev);
                }
                None => {
                    self.deletion_log.shift_remove(item);
                }
            }
            return Err(e);
        }

        if count == self.config.flag_threshold {
            info!(item, count, "line item flagged");
        } else {
            debug!(item, count, "deletion logged");
        }
        Ok(count)
    }

    /// Pull every corrected item's remembered cost toward its correction average.
    ///
    /// Items seen for the first time are seeded with the average. Known items
    /// move by the smoothing weight: `old * 0.8 + avg * 0.2` with the default
    /// configuration. The cost memory is written once after all items are
    /// processed. Returns the number of items recomputed.
    pub fn recompute_cost_memory(&mut self) -> Result<usize> {
        let weight = self.config.smoothing_weight;
        let mut updated = self.cost_memory.clone();
        let mut count = 0;

        for (item, corrections) in &self.correction_log {
            if corrections.is_empty() {
                continue;
            }

            let avg = corrections.iter().map(|c| c.corrected_cost).sum::<f64>()
                / corrections.len() as f64;

            let new_cost = match updated.get(item) {
                Some(existing) => self.config.round(existing * (1.0 - weight) + avg * weight),
                None => self.config.round(avg),
            };

            updated.insert(item.clone(), new_cost);
            count += 1;
        }

        save_document(self.backend.as_ref(), DocumentKind::CostMemory, &updated)?;
        self.cost_memory = updated;

        info!(items = count, "cost memory recomputed");
        Ok(count)
    }

    /// Items deleted at least `threshold` times, in the order first deleted.
    pub fn flagged_items_at(&self, threshold: u64) -> IndexSet<String> {
        self.deletion_log
            .iter()
            .filter(|(_, count)| **count >= threshold)
            .map(|(item, _)| item.clone())
            .collect()
    }

    /// Items at or above the configured flag threshold.
    pub fn flagged_items(&self) -> IndexSet<String> {
        self.flagged_items_at(self.config.flag_threshold)
    }

    /// Check whether `item` is flagged at the configured threshold.
    pub fn is_flagged(&self, item: &str) -> bool {
        self.deletion_count(item) >= self.config.flag_threshold
    }

    /// Remembered costs for every item that is not flagged.
    ///
    /// Order follows the cost memory: the order items were first learned.
    /// Flagged items keep their remembered cost; they are only hidden here.
    pub fn suggest_line_items(&self) -> Vec<LineItemSuggestion> {
        let flagged = self.flagged_items();
        self.cost_memory
            .iter()
            .filter(|(item, _)| !flagged.contains(item.as_str()))
            .map(|(item, cost)| LineItemSuggestion {
                item: item.clone(),
                suggested_cost: *cost,
            })
            .collect()
    }

    /// All remembered costs.
    pub fn cost_memory(&self) -> &CostMemory {
        &self.cost_memory
    }

    /// All logged corrections.
    pub fn correction_log(&self) -> &CorrectionLog {
        &self.correction_log
    }

    /// All deletion counts.
    pub fn deletion_log(&self) -> &DeletionLog {
        &self.deletion_log
    }

    /// Corrections logged for one item, oldest first.
    pub fn corrections_for(&self, item: &str) -> &[CorrectionRecord] {
        self.correction_log
            .get(item)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of times `item` was deleted.
    pub fn deletion_count(&self, item: &str) -> u64 {
        self.deletion_log.get(item).copied().unwrap_or(0)
    }

    /// The remembered cost of `item`, if it has been learned.
    pub fn remembered_cost(&self, item: &str) -> Option<f64> {
        self.cost_memory.get(item).copied()
    }

    /// Summarize the store's contents.
    pub fn summary(&self) -> LearningSummary {
        LearningSummary {
            learned_items: self.cost_memory.len(),
            corrected_items: self.correction_log.len(),
            total_corrections: self.correction_log.values().map(Vec::len).sum(),
            deleted_items: self.deletion_log.len(),
            flagged_items: self.flagged_items().len(),
            suggestions: self.suggest_line_items().len(),
            flag_threshold: self.config.flag_threshold,
        }
    }
}

fn validate_item_name(item: &str) -> Result<()> {
    ensure_named("line item name", item)
}

fn validate_cost(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        warn!(field, "rejected non-finite cost");
        return Err(BidcraftError::Validation(format!(
            "The {} must be a finite number",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::persistence::MemoryStore;

    fn shared_store(backend: MemoryStore) -> (CostLearningStore, Arc<MemoryStore>) {
        let backend = Arc::new(backend);
        let store = CostLearningStore::open(Arc::clone(&backend)).unwrap();
        (store, backend)
    }

    #[test]
    fn test_first_correction_seeds_cost() {
        let mut store = CostLearningStore::open(MemoryStore::new()).unwrap();
        store.record_correction("Drywall Install", 500.0, 600.0).unwrap();
        assert_eq!(store.remembered_cost("Drywall Install"), None);

        assert_eq!(store.recompute_cost_memory().unwrap(), 1);
        assert_eq!(store.remembered_cost("Drywall Install"), Some(600.0));
    }

    #[test]
    fn test_smoothing_against_prior_cost() {
        let backend =
            MemoryStore::new().with_document(DocumentKind::CostMemory, json!({"Paint": 100.0}));
        let mut store = CostLearningStore::open(backend).unwrap();

        store.record_correction("Paint", 100.0, 200.0).unwrap();
        store.recompute_cost_memory().unwrap();

        assert_eq!(store.remembered_cost("Paint"), Some(120.0));
    }

    #[test]
    fn test_average_of_all_corrections() {
        let mut store = CostLearningStore::open(MemoryStore::new()).unwrap();
        store.record_correction("Framing", 1000.0, 1100.0).unwrap();
        store.record_correction("Framing", 1000.0, 1200.0).unwrap();
        store.record_correction("Framing", 1000.0, 1000.0).unwrap();
        store.recompute_cost_memory().unwrap();

        assert_eq!(store.remembered_cost("Framing"), Some(1100.0));
    }

    #[test]
    fn test_recompute_rounds_to_cents() {
        let mut store = CostLearningStore::open(MemoryStore::new()).unwrap();
        store.record_correction("Trim", 10.0, 10.0).unwrap();
        store.record_correction("Trim", 10.0, 10.0).unwrap();
        store.record_correction("Trim", 10.0, 11.0).unwrap();
        store.recompute_cost_memory().unwrap();

        assert_eq!(store.remembered_cost("Trim"), Some(10.33));
    }

    #[test]
    fn test_items_without_corrections_untouched() {
        let backend =
            MemoryStore::new().with_document(DocumentKind::CostMemory, json!({"Roofing": 4200.0}));
        let mut store = CostLearningStore::open(backend).unwrap();
        store.record_correction("Paint", 100.0, 150.0).unwrap();

        assert_eq!(store.recompute_cost_memory().unwrap(), 1);
        assert_eq!(store.remembered_cost("Roofing"), Some(4200.0));
        assert_eq!(store.remembered_cost("Paint"), Some(150.0));
    }

    #[test]
    fn test_recompute_is_a_single_write() {
        let (mut store, backend) = shared_store(MemoryStore::new());
        store.record_correction("A", 1.0, 2.0).unwrap();
        store.record_correction("B", 1.0, 3.0).unwrap();
        store.record_correction("C", 1.0, 4.0).unwrap();
        let before = backend.write_count();

        store.recompute_cost_memory().unwrap();

        assert_eq!(backend.write_count(), before + 1);
        assert_eq!(
            backend.document(DocumentKind::CostMemory),
            Some(json!({"A": 2.0, "B": 3.0, "C": 4.0}))
        );
    }

    #[test]
    fn test_corrections_accumulate_in_order() {
        let mut store = CostLearningStore::open(MemoryStore::new()).unwrap();
        store.record_correction("Paint", 100.0, 110.0).unwrap();
        store.record_correction("Paint", 110.0, 90.0).unwrap();

        let records = store.corrections_for("Paint");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].corrected_cost, 110.0);
        assert_eq!(records[1].corrected_cost, 90.0);
        assert_eq!(records[1].adjustment, -20.0);
        assert!(records[0].timestamp <= records[1].timestamp);
    }

    #[test]
    fn test_deletion_counts_and_flagging() {
        let mut store = CostLearningStore::open(MemoryStore::new()).unwrap();
        assert_eq!(store.record_deletion("Framing").unwrap(), 1);
        assert_eq!(store.record_deletion("Framing").unwrap(), 2);
        assert!(!store.is_flagged("Framing"));

        assert_eq!(store.record_deletion("Framing").unwrap(), 3);
        assert!(store.is_flagged("Framing"));
        assert!(store.flagged_items().contains("Framing"));
        assert!(store.flagged_items_at(4).is_empty());
        assert!(store.flagged_items_at(1).contains("Framing"));
    }

    #[test]
    fn test_flagged_item_hidden_but_retained() {
        let backend =
            MemoryStore::new().with_document(DocumentKind::CostMemory, json!({"Framing": 5000.0, "Paint": 300.0}));
        let mut store = CostLearningStore::open(backend).unwrap();
        for _ in 0..3 {
            store.record_deletion("Framing").unwrap();
        }

        let suggestions = store.suggest_line_items();
        assert_eq!(
            suggestions,
            vec![LineItemSuggestion {
                item: "Paint".to_string(),
                suggested_cost: 300.0
            }]
        );
        assert_eq!(store.remembered_cost("Framing"), Some(5000.0));

        // Later corrections still update memory, but the item stays hidden
        store.record_correction("Framing", 5000.0, 5500.0).unwrap();
        store.recompute_cost_memory().unwrap();
        assert_eq!(store.remembered_cost("Framing"), Some(5100.0));
        assert!(store.suggest_line_items().iter().all(|s| s.item != "Framing"));
    }

    #[test]
    fn test_suggestions_follow_learning_order() {
        let mut store = CostLearningStore::open(MemoryStore::new()).unwrap();
        store.record_correction("Zinc Flashing", 1.0, 30.0).unwrap();
        store.record_correction("Anchor Bolts", 1.0, 2.0).unwrap();
        store.record_correction("Mobilization", 1.0, 900.0).unwrap();
        store.recompute_cost_memory().unwrap();

        let items: Vec<_> = store.suggest_line_items().into_iter().map(|s| s.item).collect();
        assert_eq!(items, vec!["Zinc Flashing", "Anchor Bolts", "Mobilization"]);
    }

    #[test]
    fn test_blank_item_rejected() {
        let (mut store, backend) = shared_store(MemoryStore::new());

        let err = store.record_correction("", 1.0, 2.0).unwrap_err();
        assert!(err.is_validation());
        assert!(store.record_correction("   ", 1.0, 2.0).unwrap_err().is_validation());
        assert!(store.record_deletion("").unwrap_err().is_validation());

        assert!(store.correction_log().is_empty());
        assert!(store.deletion_log().is_empty());
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn test_non_finite_cost_rejected() {
        let mut store = CostLearningStore::open(MemoryStore::new()).unwrap();
        assert!(store.record_correction("Paint", f64::NAN, 2.0).unwrap_err().is_validation());
        assert!(store.record_correction("Paint", 1.0, f64::INFINITY).unwrap_err().is_validation());
        assert!(store.correction_log().is_empty());
    }

    #[test]
    fn test_failed_writes_roll_back() {
        let (mut store, backend) = shared_store(MemoryStore::new());
        store.record_correction("Paint", 100.0, 120.0).unwrap();
        store.record_deletion("Paint").unwrap();
        store.recompute_cost_memory().unwrap();

        backend.set_fail_writes(true);
        assert!(store.record_correction("Paint", 100.0, 200.0).is_err());
        assert!(store.record_correction("Stucco", 100.0, 200.0).is_err());
        assert!(store.record_deletion("Paint").is_err());
        assert!(store.record_deletion("Stucco").is_err());

        assert_eq!(store.corrections_for("Paint").len(), 1);
        assert!(store.corrections_for("Stucco").is_empty());
        assert!(!store.correction_log().contains_key("Stucco"));
        assert_eq!(store.deletion_count("Paint"), 1);
        assert!(!store.deletion_log().contains_key("Stucco"));

        backend.set_fail_writes(false);
        store.record_correction("Paint", 100.0, 200.0).unwrap();
        backend.set_fail_writes(true);
        assert!(store.recompute_cost_memory().is_err());
        assert_eq!(store.remembered_cost("Paint"), Some(120.0));
    }

    #[test]
    fn test_summary() {
        let mut store = CostLearningStore::open(MemoryStore::new()).unwrap();
        store.record_correction("Paint", 100.0, 120.0).unwrap();
        store.record_correction("Paint", 100.0, 140.0).unwrap();
        store.record_correction("Framing", 100.0, 140.0).unwrap();
        store.recompute_cost_memory().unwrap();
        for _ in 0..3 {
            store.record_deletion("Framing").unwrap();
        }
        store.record_deletion("Demo").unwrap();

        let summary = store.summary();
        assert_eq!(summary.learned_items, 2);
        assert_eq!(summary.corrected_items, 2);
        assert_eq!(summary.total_corrections, 3);
        assert_eq!(summary.deleted_items, 2);
        assert_eq!(summary.flagged_items, 1);
        assert_eq!(summary.suggestions, 1);
        assert_eq!(summary.flag_threshold, 3);
    }

    #[test]
    fn test_custom_threshold_and_weight() {
        let config = LearningConfig::new()
            .with_flag_threshold(1)
            .with_smoothing_weight(0.5);
        let backend =
            MemoryStore::new().with_document(DocumentKind::CostMemory, json!({"Paint": 100.0}));
        let mut store = CostLearningStore::with_config(backend, config).unwrap();

        store.record_correction("Paint", 100.0, 200.0).unwrap();
        store.recompute_cost_memory().unwrap();
        assert_eq!(store.remembered_cost("Paint"), Some(150.0));

        store.record_deletion("Paint").unwrap();
        assert!(store.suggest_line_items().is_empty());
    }

    #[test]
    fn test_invalid_config_rejected_at_open() {
        let config = LearningConfig::new().with_flag_threshold(0);
        let err = CostLearningStore::with_config(MemoryStore::new(), config).unwrap_err();
        assert!(matches!(err, BidcraftError::Config(_)));
    }

    #[test]
    fn test_saturated_deletion_count_is_an_error() {
        let (mut store, backend) = shared_store(
            MemoryStore::new().with_document(DocumentKind::DeletionLog, json!({"Framing": u64::MAX})),
        );

        let err = store.record_deletion("Framing").unwrap_err();
        assert!(matches!(err, BidcraftError::Persistence(_)));
        assert_eq!(store.deletion_count("Framing"), u64::MAX);
        assert!(store.is_flagged("Framing"));
        assert_eq!(backend.write_count(), 0);
    }
}
