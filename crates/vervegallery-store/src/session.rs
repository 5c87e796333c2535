//! Session storage adapters
//!
//! - [`FileSessionStorage`] keeps all records in one JSON object on disk
//! - [`MemorySessionStorage`] keeps them in memory, for tests and dry runs

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use vervegallery_core::ports::ISessionStorage;

type Records = BTreeMap<String, String>;

// ============================================================================
// FileSessionStorage
// ============================================================================

/// [`ISessionStorage`] backed by a JSON file
///
/// The file holds a single object mapping keys to raw string values. It is
/// rewritten through a temporary file and a rename, so readers never see a
/// half-written file. A file that does not parse reads as empty and is
/// replaced by the next write.
#[derive(Debug)]
pub struct FileSessionStorage {
    path: PathBuf,
    /// Serializes read-modify-write cycles
    lock: Mutex<()>,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_records(&self) -> Result<Records> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Records::new()),
            Ok(content) => match serde_json::from_str(&content) {
                Ok(records) => Ok(records),
                Err(e) => {
                    // the next write replaces the file
                    warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Session file is corrupt, starting empty"
                    );
                    Ok(Records::new())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Records::new()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("Failed to read session file {}", self.path.display()))),
        }
    }

    async fn write_records(&self, records: &Records) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(records).context("Failed to serialize session")?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        debug!(path = %self.path.display(), records = records.len(), "Session file written");
        Ok(())
    }
}

#[async_trait::async_trait]
impl ISessionStorage for FileSessionStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_records().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_records().await?;
        records.insert(key.to_string(), value.to_string());
        self.write_records(&records).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_records().await?;
        if records.remove(key).is_some() {
            self.write_records(&records).await?;
        }
        Ok(())
    }
}

// ============================================================================
// MemorySessionStorage
// ============================================================================

/// In-memory [`ISessionStorage`]
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    records: DashMap<String, String>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-filled with one record
    pub fn with_record(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.records.insert(key.into(), value.into());
        storage
    }
}

#[async_trait::async_trait]
impl ISessionStorage for MemorySessionStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records.get(key).map(|v| v.clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.records.remove(key);
        Ok(())
    }
}
