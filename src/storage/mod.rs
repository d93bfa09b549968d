// src/storage/mod.rs

//! File-backed cache for intermediate pipeline results.
//!
//! Each pipeline stage persists its output as one JSON document at a
//! deterministic path under the data directory. File existence is the only
//! consistency signal: there is no checksum and no freshness timestamp. A
//! document is invalidated by deleting the file or by running the stage with
//! its requery flag enabled.

use std::future::Future;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};

/// Get-or-populate cache over JSON files in one directory.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root_dir: PathBuf,
}

impl CacheStore {
    /// Create a cache store rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Full path of a cache document.
    pub fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Load the document for `key`, or populate it from `producer`.
    ///
    /// - `requery` set: run the producer, overwrite the file, return the
    ///   fresh value.
    /// - `requery` unset, file present: deserialize and return it verbatim;
    ///   the producer never runs.
    /// - `requery` unset, file absent: [`AppError::CacheMiss`]. There is no
    ///   recovery path; the caller is expected to exit.
    ///
    /// `label` names the document kind in log lines and error messages.
    pub async fn load_or_compute<T, F, Fut>(
        &self,
        key: &str,
        label: &str,
        requery: bool,
        producer: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let path = self.path(key);

        if requery {
            let value = producer().await?;
            self.write_json(&path, &value).await?;
            info!("Saved {} to {}", label, path.display());
            return Ok(value);
        }

        match self.read_json(&path).await? {
            Some(value) => {
                info!("Read {} from {}", label, path.display());
                Ok(value)
            }
            None => Err(AppError::cache_miss(label, path)),
        }
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    async fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)?;
        self.write_bytes(path, &bytes).await
    }

    /// Read a document, returning `None` if the file doesn't exist. An
    /// existing-but-empty file is a decode error, not a miss.
    async fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}
