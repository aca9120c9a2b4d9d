//! Fuzz target for opening a store over arbitrary stored documents.
//!
//! This fuzzer tests that opening a store:
//! 1. Never panics on any document contents
//! 2. Either loads the logs or reports a persistence error
//! 3. Keeps suggestions consistent with the flagged set after loading

#![no_main]

use arbitrary::Arbitrary;
use bidcraft::{CostLearningStore, DocumentKind, MemoryStore};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Documents<'a> {
    cost_memory: &'a [u8],
    correction_log: &'a [u8],
    deletion_log: &'a [u8],
}

fuzz_target!(|docs: Documents<'_>| {
    let mut backend = MemoryStore::new();
    for (kind, bytes) in [
        (DocumentKind::CostMemory, docs.cost_memory),
        (DocumentKind::CorrectionLog, docs.correction_log),
        (DocumentKind::DeletionLog, docs.deletion_log),
    ] {
        if let Ok(value) = serde_json::from_slice(bytes) {
            backend = backend.with_document(kind, value);
        }
    }

    if let Ok(mut store) = CostLearningStore::open(backend) {
        let flagged = store.flagged_items();
        for suggestion in store.suggest_line_items() {
            assert!(!flagged.contains(suggestion.item.as_str()));
        }
        let _ = store.recompute_cost_memory();
        let _ = store.summary();
    }
});
