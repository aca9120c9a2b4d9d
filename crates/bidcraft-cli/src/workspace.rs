//! Data directory and configuration resolution.

use std::path::PathBuf;

use bidcraft::{CostLearningStore, JsonFileStore, LearningConfig, ProfileRegistry};
use tracing::debug;

/// Name of the configuration file looked up in the data directory.
pub const CONFIG_FILE_NAME: &str = "bidcraft.toml";

/// Where the documents live and how the engine is configured.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub data_dir: PathBuf,
    pub config: LearningConfig,
}

impl Workspace {
    /// Resolve configuration: an explicit file must exist; otherwise
    /// `<data_dir>/bidcraft.toml` is used when present, then defaults.
    pub fn resolve(
        data_dir: PathBuf,
        config_path: Option<PathBuf>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(format!("Config file not found: {}", path.display()).into());
                }
                debug!(path = %path.display(), "loading config");
                LearningConfig::load(&path)?
            }
            None => {
                let default_path = data_dir.join(CONFIG_FILE_NAME);
                if default_path.exists() {
                    debug!(path = %default_path.display(), "loading config");
                    LearningConfig::load(&default_path)?
                } else {
                    LearningConfig::default()
                }
            }
        };

        Ok(Self { data_dir, config })
    }

    /// The document store for this data directory.
    pub fn documents(&self) -> JsonFileStore {
        JsonFileStore::new(&self.data_dir)
    }

    /// Open the cost-learning store.
    pub fn open_store(&self) -> bidcraft::Result<CostLearningStore> {
        CostLearningStore::with_config(self.documents(), self.config.clone())
    }

    /// Open the contractor profile registry.
    pub fn open_profiles(&self) -> bidcraft::Result<ProfileRegistry> {
        ProfileRegistry::open(self.documents())
    }
}
