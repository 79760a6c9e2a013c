//! Error types for the profile editor's remote boundaries
//!
//! - [`IdentityError`]: failures of the identity/session provider.
//! - [`StorageError`]: failures of the object storage transport.
//! - [`UploadError`]: failures of the upload coordinator (wraps storage).
//! - [`SubmitError`]: any failure inside the profile submission pipeline.
//!
//! File constraint violations are `ConstraintViolation`s in [`crate::upload`];
//! they are reported through the feedback channel and never propagate.

use thiserror::Error;

/// Errors produced by the identity/session provider.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// No user is signed in, or the session was invalidated.
    #[error("no signed-in user")]
    SignedOut,

    /// The provider could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The provider refused the mutation.
    #[error("permission denied: {0}")]
    Permission(String),

    /// The provider's backing store could not be read or written.
    #[error("identity store error: {0}")]
    Store(String),
}

/// Errors produced by the object storage transport.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The application-chosen path is not a legal object path.
    #[error("invalid object path: {0:?}")]
    InvalidPath(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The transport rejected or failed the request.
    #[error("storage transport error: {0}")]
    Transport(String),
}

/// Errors produced by the upload step of the coordinator.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Uploading requires a signed-in identity to derive the destination.
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// Any failure of the submission pipeline; the message is what the user sees.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

impl SubmitError {
    /// Short stable label for structured logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            SubmitError::Identity(_) => "submit_identity_failed",
            SubmitError::Upload(_) => "submit_upload_failed",
        }
    }
}
