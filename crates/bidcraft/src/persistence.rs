//! Durable document storage.
//!
//! Each log is one whole document: read once when a store opens and
//! rewritten in full after every mutation. A missing document reads as
//! `None`, which callers treat as an empty mapping.
//!
//! ```text
//! data/
//! ├── cost_memory.json
//! ├── correction_log.json
//! ├── delete_log.json
//! └── gc_profile.json
//! ```

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{BidcraftError, Result};

/// The logical documents a data directory holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    CostMemory,
    CorrectionLog,
    DeletionLog,
    Profiles,
}

impl DocumentKind {
    /// File name used by [`JsonFileStore`].
    pub fn file_name(&self) -> &'static str {
        match self {
            DocumentKind::CostMemory => "cost_memory.json",
            DocumentKind::CorrectionLog => "correction_log.json",
            DocumentKind::DeletionLog => "delete_log.json",
            DocumentKind::Profiles => "gc_profile.json",
        }
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::CostMemory => "cost memory",
            DocumentKind::CorrectionLog => "correction log",
            DocumentKind::DeletionLog => "deletion log",
            DocumentKind::Profiles => "contractor profiles",
        }
    }
}

/// Whole-document persistence backend.
pub trait DocumentStore: Send + Sync {
    /// Short name for log output.
    fn name(&self) -> &str;

    /// Read a document, or `None` if it has never been written.
    fn read(&self, kind: DocumentKind) -> Result<Option<Value>>;

    /// Replace a document. Either the whole document is stored or nothing is.
    fn write(&self, kind: DocumentKind, document: &Value) -> Result<()>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn read(&self, kind: DocumentKind) -> Result<Option<Value>> {
        (**self).read(kind)
    }

    fn write(&self, kind: DocumentKind, document: &Value) -> Result<()> {
        (**self).write(kind, document)
    }
}

/// Load a typed document, using `T::default()` when it does not exist yet.
///
/// A document that exists but does not match `T` is an error: stored
/// history is never silently discarded.
pub fn load_document<T>(store: &dyn DocumentStore, kind: DocumentKind) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match store.read(kind)? {
        None => {
            debug!(store = store.name(), document = kind.label(), "document missing, starting empty");
            Ok(T::default())
        }
        Some(value) => serde_json::from_value(value).map_err(|e| {
            BidcraftError::Persistence(format!(
                "Malformed {} in {} store: {}",
                kind.label(),
                store.name(),
                e
            ))
        }),
    }
}

/// Serialize and write a typed document.
pub fn save_document<T>(store: &dyn DocumentStore, kind: DocumentKind, document: &T) -> Result<()>
where
    T: Serialize,
{
    let value = serde_json::to_value(document).map_err(|e| {
        BidcraftError::Persistence(format!("Failed to serialize {}: {}", kind.label(), e))
    })?;
    store.write(kind, &value)?;
    debug!(store = store.name(), document = kind.label(), "document persisted");
    Ok(())
}

/// Pretty-printed JSON files, one per document, in a single directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Store documents under `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The data directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of a document.
    pub fn path_for(&self, kind: DocumentKind) -> PathBuf {
        self.dir.join(kind.file_name())
    }
}

impl DocumentStore for JsonFileStore {
    fn name(&self) -> &str {
        "json-file"
    }

    fn read(&self, kind: DocumentKind) -> Result<Option<Value>> {
        let path = self.path_for(kind);

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(BidcraftError::Io { path, source: e }),
        };

        let value = serde_json::from_str(&text).map_err(|e| {
            BidcraftError::Persistence(format!(
                "Failed to parse {} '{}': {}",
                kind.label(),
                path.display(),
                e
            ))
        })?;

        Ok(Some(value))
    }

    fn write(&self, kind: DocumentKind, document: &Value) -> Result<()> {
        // Create the data directory if needed
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(|e| {
                BidcraftError::Persistence(format!(
                    "Failed to create directory '{}': {}",
                    self.dir.display(),
                    e
                ))
            })?;
        }

        let path = self.path_for(kind);
        let text = serde_json::to_string_pretty(document).map_err(|e| {
            BidcraftError::Persistence(format!("Failed to serialize {}: {}", kind.label(), e))
        })?;

        // Write beside the target, then rename over it
        let mut tmp = path.clone();
        tmp.set_extension("json.tmp");
        fs::write(&tmp, text).map_err(|e| BidcraftError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        fs::rename(&tmp, &path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            BidcraftError::Persistence(format!(
                "Failed to replace '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(())
    }
}

/// In-process document store.
///
/// Counts writes and can be told to fail them, which makes it the backend of
/// choice for tests and for embedding the engine without a filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<DocumentKind, Value>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document, as if a previous process had written it.
    pub fn with_document(self, kind: DocumentKind, document: Value) -> Self {
        self.lock().insert(kind, document);
        self
    }

    /// Current contents of a document.
    pub fn document(&self, kind: DocumentKind) -> Option<Value> {
        self.lock().get(&kind).cloned()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<DocumentKind, Value>> {
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DocumentStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn read(&self, kind: DocumentKind) -> Result<Option<Value>> {
        Ok(self.lock().get(&kind).cloned())
    }

    fn write(&self, kind: DocumentKind, document: &Value) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BidcraftError::Persistence(format!(
                "Write of {} refused by memory store",
                kind.label()
            )));
        }
        self.lock().insert(kind, document.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
