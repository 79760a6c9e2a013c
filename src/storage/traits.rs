//! Trait abstraction for the object store to enable mocking in tests

use crate::error::StorageError;
use async_trait::async_trait;

/// Opaque reference to a stored object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectHandle {
    pub path: String,
}

/// Binary object storage operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` at `path`, replacing any existing object
    async fn upload(&self, path: &str, bytes: Vec<u8>) -> Result<ObjectHandle, StorageError>;

    /// Publicly resolvable URL for a stored object
    async fn public_url(&self, handle: &ObjectHandle) -> Result<String, StorageError>;
}

/// Basic legality: relative, non-empty segments, no `.` or `..`
pub fn validate_path(path: &str) -> Result<(), StorageError> {
    let legal = !path.is_empty()
        && !path.starts_with('/')
        && !path.contains('\\')
        && path
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
    if legal {
        Ok(())
    } else {
        Err(StorageError::InvalidPath(path.to_string()))
    }
}
