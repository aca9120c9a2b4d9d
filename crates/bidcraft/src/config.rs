//! Configuration for the cost-learning engine.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BidcraftError, Result};

/// Deletions needed before a line item is flagged.
pub const DEFAULT_FLAG_THRESHOLD: u64 = 3;

/// Weight given to the latest correction average during recompute.
pub const DEFAULT_SMOOTHING_WEIGHT: f64 = 0.2;

/// Decimal places kept on remembered costs.
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// Configuration for [`CostLearningStore`](crate::learning::CostLearningStore).
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// flag_threshold = 5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    /// Items deleted at least this many times are flagged.
    pub flag_threshold: u64,
    /// Fraction of the distance to the correction average covered per recompute.
    pub smoothing_weight: f64,
    /// Rounding precision for remembered costs.
    pub decimal_places: u32,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            flag_threshold: DEFAULT_FLAG_THRESHOLD,
            smoothing_weight: DEFAULT_SMOOTHING_WEIGHT,
            decimal_places: DEFAULT_DECIMAL_PLACES,
        }
    }
}

impl LearningConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the deletion count at which items are flagged.
    pub fn with_flag_threshold(mut self, threshold: u64) -> Self {
        self.flag_threshold = threshold;
        self
    }

    /// Set the smoothing weight (0.0 exclusive to 1.0 inclusive).
    pub fn with_smoothing_weight(mut self, weight: f64) -> Self {
        self.smoothing_weight = weight;
        self
    }

    /// Set the number of decimal places kept on remembered costs.
    pub fn with_decimal_places(mut self, places: u32) -> Self {
        self.decimal_places = places;
        self
    }

    /// Parse a configuration from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: LearningConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| BidcraftError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check that the values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.flag_threshold == 0 {
            return Err(BidcraftError::Config(
                "flag_threshold must be at least 1".to_string(),
            ));
        }
        if !(self.smoothing_weight > 0.0 && self.smoothing_weight <= 1.0) {
            return Err(BidcraftError::Config(format!(
                "smoothing_weight must be in (0, 1], got {}",
                self.smoothing_weight
            )));
        }
        if self.decimal_places > 6 {
            return Err(BidcraftError::Config(format!(
                "decimal_places must be at most 6, got {}",
                self.decimal_places
            )));
        }
        Ok(())
    }

    /// Round a cost to the configured precision.
    pub fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.decimal_places as i32);
        (value * factor).round() / factor
    }
}
