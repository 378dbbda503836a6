//! Persistence configuration.

use crate::store::{JsonFileStore, MemoryStore, SnapshotStore};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Where the snapshot document lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Process memory only; lost on restart.
    Memory,
    /// A single JSON file on disk.
    #[default]
    JsonFile,
}

/// Persistence configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Document path for the `json_file` backend.
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

fn default_path() -> PathBuf {
    PathBuf::from("data/top_coins.json")
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_path(),
        }
    }
}

impl PersistenceConfig {
    /// Build the configured store.
    pub fn build_store(&self) -> Arc<dyn SnapshotStore> {
        match self.backend {
            StoreBackend::Memory => Arc::new(MemoryStore::new()),
            StoreBackend::JsonFile => Arc::new(JsonFileStore::new(&self.path)),
        }
    }
}
