//! Application state for the web server.

use std::sync::Arc;
use tokio::sync::RwLock;

use bidcraft::{CostLearningStore, ProfileRegistry};

/// Shared application state.
///
/// One lock guards all three learning logs, so each request's mutation and
/// write-through complete before the next request sees the store.
#[derive(Clone)]
pub struct AppState {
    /// The cost-learning store.
    pub store: Arc<RwLock<CostLearningStore>>,
    /// Contractor profiles.
    pub profiles: Arc<RwLock<ProfileRegistry>>,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: CostLearningStore, profiles: ProfileRegistry) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            profiles: Arc::new(RwLock::new(profiles)),
        }
    }
}
