//! Snapshot store backends.
//!
//! Both backends hold at most one document. `replace` swaps the whole
//! document; a concurrent `load` sees either the old document or the new one.

use crate::document::SnapshotDocument;
use crate::error::PersistenceResult;
use parking_lot::RwLock;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Single-document store for the latest ranked snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Replace the stored document.
    fn replace(&self, document: &SnapshotDocument) -> PersistenceResult<()>;

    /// Load the stored document, if any.
    fn load(&self) -> PersistenceResult<Option<SnapshotDocument>>;

    /// Short backend description for logs.
    fn describe(&self) -> String;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: RwLock<Option<SnapshotDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn replace(&self, document: &SnapshotDocument) -> PersistenceResult<()> {
        *self.document.write() = Some(document.clone());
        Ok(())
    }

    fn load(&self) -> PersistenceResult<Option<SnapshotDocument>> {
        Ok(self.document.read().clone())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// JSON file store.
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so readers never observe a partially written document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Document path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for JsonFileStore {
    fn replace(&self, document: &SnapshotDocument) -> PersistenceResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();
        {
            let file = fs::File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, document)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&temp_path, &self.path)?;

        debug!(
            path = %self.path.display(),
            coins = document.coins.len(),
            "Replaced snapshot document"
        );
        Ok(())
    }

    fn load(&self) -> PersistenceResult<Option<SnapshotDocument>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No persisted snapshot document");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let document: SnapshotDocument = serde_json::from_slice(&bytes)?;
        Ok(Some(document))
    }

    fn describe(&self) -> String {
        format!("json_file:{}", self.path.display())
    }
}
