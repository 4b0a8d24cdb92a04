//! Named configuration objects.
//!
//! Settings and handler attachments are stored as JSON objects under dotted
//! names such as `webform_trello.settings`. The file store keeps one
//! `<name>.json` file per object.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

/// Errors raised by a config store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Name contains characters that are not allowed
    #[error("Invalid config name: {0}")]
    InvalidName(String),

    /// Reading or writing the backing file failed
    #[error("Config I/O error for {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored object is not valid JSON or has the wrong shape
    #[error("Invalid config data for {name}: {source}")]
    Data {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistence for named configuration objects.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Load an object, `None` if it was never saved.
    async fn get(&self, name: &str) -> Result<Option<Value>, StoreError>;

    /// Save an object, replacing any previous value.
    async fn set(&self, name: &str, value: Value) -> Result<(), StoreError>;

    /// Delete an object. Returns whether it existed.
    async fn delete(&self, name: &str) -> Result<bool, StoreError>;
}

/// Config names are dotted identifiers: `[A-Za-z0-9_-]` segments joined by `.`.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let valid = !name.is_empty()
        && name.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        });

    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}

/// Store that keeps objects in memory (tests, one-off CLI runs).
#[derive(Default)]
pub struct MemoryConfigStore {
    objects: RwLock<HashMap<String, Value>>,
}

impl MemoryConfigStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn get(&self, name: &str) -> Result<Option<Value>, StoreError> {
        validate_name(name)?;
        Ok(self.objects.read().await.get(name).cloned())
    }

    async fn set(&self, name: &str, value: Value) -> Result<(), StoreError> {
        validate_name(name)?;
        self.objects.write().await.insert(name.to_string(), value);
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool, StoreError> {
        validate_name(name)?;
        Ok(self.objects.write().await.remove(name).is_some())
    }
}

/// Store that keeps one pretty-printed JSON file per object in a directory.
///
/// Writes and deletes through one store (and its clones) are serialized.
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    dir: PathBuf,
    writes: Arc<Mutex<()>>,
}

impl FileConfigStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            writes: Arc::new(Mutex::new(())),
        }
    }

    /// Directory holding the config files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        Ok(self.dir.join(format!("{name}.json")))
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn get(&self, name: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path(name)?;
        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    name: name.to_string(),
                    source,
                })
            }
        };

        serde_json::from_slice(&content)
            .map(Some)
            .map_err(|source| StoreError::Data {
                name: name.to_string(),
                source,
            })
    }

    async fn set(&self, name: &str, value: Value) -> Result<(), StoreError> {
        let path = self.path(name)?;
        let io_err = |source: std::io::Error| StoreError::Io {
            name: name.to_string(),
            source,
        };

        tokio::fs::create_dir_all(&self.dir).await.map_err(io_err)?;

        let content = serde_json::to_vec_pretty(&value).map_err(|source| StoreError::Data {
            name: name.to_string(),
            source,
        })?;

        let _guard = self.writes.lock().await;

        // Write to a uniquely named sibling first so readers never see a
        // partial object.
        let tmp = self.dir.join(format!(".{name}.{}.tmp", Uuid::new_v4().simple()));
        tokio::fs::write(&tmp, content).await.map_err(io_err)?;
        if let Err(source) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io_err(source));
        }

        debug!(name, path = %path.display(), "Saved config object");
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool, StoreError> {
        let path = self.path(name)?;
        let _guard = self.writes.lock().await;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Io {
                name: name.to_string(),
                source,
            }),
        }
    }
}
