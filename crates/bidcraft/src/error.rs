//! Error types for the Bidcraft library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Bidcraft operations.
#[derive(Debug, Error)]
pub enum BidcraftError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing to an output stream that is not a stored document.
    #[error("IO error writing {target}: {source}")]
    Write {
        target: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Input rejected before it reached any log.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A stored document could not be read, parsed, or written.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Error parsing bid rows.
    #[error("Parse error at row {row}: {message}")]
    Parse { row: usize, message: String },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl BidcraftError {
    /// Check whether this error was caused by rejected user input.
    pub fn is_validation(&self) -> bool {
        matches!(self, BidcraftError::Validation(_))
    }
}

/// Reject names that are empty or only whitespace.
///
/// `what` names the field in the message, as in "Enter a company name".
pub(crate) fn ensure_named(what: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        tracing::warn!(field = what, "rejected blank name");
        return Err(BidcraftError::Validation(format!("Enter a {}", what)));
    }
    Ok(())
}

/// Result type alias for Bidcraft operations.
pub type Result<T> = std::result::Result<T, BidcraftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_named() {
        assert!(ensure_named("line item name", "Paint").is_ok());
        assert!(ensure_named("line item name", " Paint ").is_ok());

        let err = ensure_named("company name", " \t").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Validation error: Enter a company name");
    }
}
