//! Object store writing under a local directory

use super::traits::{validate_path, ObjectHandle, ObjectStore};
use crate::error::StorageError;
use async_trait::async_trait;
use std::path::PathBuf;

/// Stores objects as files under `root`
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Serve objects straight from disk as `file://` URLs
    pub fn with_file_urls(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let base = format!("file://{}", root.display());
        Self::new(root, base)
    }

    fn object_path(&self, path: &str) -> PathBuf {
        path.split('/')
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<ObjectHandle, StorageError> {
        validate_path(path)?;
        let target = self.object_path(path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let size = bytes.len();
        tokio::fs::write(&target, bytes).await?;
        tracing::debug!(path, size, "stored object");
        Ok(ObjectHandle {
            path: path.to_string(),
        })
    }

    async fn public_url(&self, handle: &ObjectHandle) -> Result<String, StorageError> {
        validate_path(&handle.path)?;
        if !tokio::fs::try_exists(self.object_path(&handle.path)).await? {
            return Err(StorageError::Transport(format!(
                "object not found: {}",
                handle.path
            )));
        }
        Ok(format!("{}/{}", self.public_base_url, handle.path))
    }
}
