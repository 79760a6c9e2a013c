//! Pending-file selection and upload

use super::constraints::{FileConstraints, PendingFile, Rejection, SelectedFile};
use crate::error::UploadError;
use crate::feedback::{Notice, Notify};
use crate::identity::Session;
use crate::storage::ObjectStore;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

/// Immutable URL of an uploaded object
pub type UploadedReference = String;

/// External file chooser (dialog, prompt, drag and drop, ...)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileChooser: Send + Sync {
    /// `None` when the user cancelled
    async fn choose(&self) -> Result<Option<SelectedFile>>;
}

/// Outcome of [`UploadCoordinator::select`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Accepted(PendingFile),
    Rejected(Rejection),
    Cancelled,
}

/// Holds at most one pending file and uploads it on demand
pub struct UploadCoordinator {
    constraints: FileConstraints,
    store: Arc<dyn ObjectStore>,
    session: Session,
    feedback: Arc<dyn Notify>,
    pending: Mutex<Option<PendingFile>>,
}

impl UploadCoordinator {
    pub fn new(
        constraints: FileConstraints,
        store: Arc<dyn ObjectStore>,
        session: Session,
        feedback: Arc<dyn Notify>,
    ) -> Self {
        Self {
            constraints,
            store,
            session,
            feedback,
            pending: Mutex::new(None),
        }
    }

    pub fn constraints(&self) -> &FileConstraints {
        &self.constraints
    }

    /// Discard the previous file, run the chooser, and validate its result.
    ///
    /// A rejected file produces one aggregated error notice.
    pub async fn select(&self, chooser: &dyn FileChooser) -> Result<Selection> {
        self.clear();
        let Some(file) = chooser.choose().await? else {
            return Ok(Selection::Cancelled);
        };
        Ok(self.offer(file))
    }

    /// Validate a file obtained outside a chooser and hold it if accepted.
    ///
    /// Any previous pending file is discarded either way.
    pub fn offer(&self, file: SelectedFile) -> Selection {
        let name = file.name.clone();
        match self.constraints.inspect(file) {
            Ok(pending) => {
                tracing::info!(
                    file = %pending.name,
                    width = pending.width,
                    height = pending.height,
                    "file selected"
                );
                *self.lock() = Some(pending.clone());
                Selection::Accepted(pending)
            }
            Err(rejection) => {
                tracing::info!(file = %name, violations = rejection.0.len(), "file rejected");
                self.clear();
                self.feedback.notify(Notice::error(rejection.to_string()));
                Selection::Rejected(rejection)
            }
        }
    }

    pub fn clear(&self) {
        if self.lock().take().is_some() {
            tracing::debug!("pending file cleared");
        }
    }

    /// Clear only if `id` is still the pending selection
    pub fn clear_if(&self, id: Uuid) -> bool {
        let mut pending = self.lock();
        if pending.as_ref().is_some_and(|file| file.id == id) {
            *pending = None;
            true
        } else {
            false
        }
    }

    /// Copy of the pending file, if any
    pub fn pending(&self) -> Option<PendingFile> {
        self.lock().clone()
    }

    /// `{uid}/{folder}/{file name}`: re-uploading a name overwrites it
    pub fn destination(&self, file: &PendingFile, folder: &str) -> Result<String, UploadError> {
        let uid = self.session.uid()?;
        Ok(format!("{uid}/{folder}/{}", file.name))
    }

    /// Upload `file` to its derived destination and return its public URL
    pub async fn upload(
        &self,
        file: &PendingFile,
        folder: &str,
    ) -> Result<UploadedReference, UploadError> {
        let path = self.destination(file, folder)?;
        tracing::info!(%path, size = file.size_bytes, "uploading file");
        let handle = self.store.upload(&path, file.bytes.clone()).await?;
        let url = self.store.public_url(&handle).await?;
        Ok(url)
    }

    fn lock(&self) -> MutexGuard<'_, Option<PendingFile>> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::feedback::{MockNotify, Severity};
    use crate::identity::{MockIdentityProvider, UserProfile};
    use crate::storage::{LocalObjectStore, MockObjectStore, ObjectHandle};
    use crate::upload::constraints::test_support::png;
    use crate::upload::constraints::ConstraintViolation;

    async fn session() -> Session {
        let mut provider = MockIdentityProvider::new();
        provider.expect_current_user().returning(|| {
            Ok(Some(UserProfile {
                uid: "uid-ada".to_string(),
                display_name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                avatar_url: None,
                updated_at: None,
            }))
        });
        Session::acquire(Arc::new(provider)).await.unwrap()
    }

    fn chooser(file: Option<SelectedFile>) -> MockFileChooser {
        let mut chooser = MockFileChooser::new();
        chooser
            .expect_choose()
            .times(1)
            .return_once(move || Ok(file));
        chooser
    }

    fn quiet() -> Arc<MockNotify> {
        let mut notify = MockNotify::new();
        notify.expect_notify().never();
        Arc::new(notify)
    }

    #[tokio::test]
    async fn test_valid_selection_becomes_pending_without_notice() {
        let coordinator = UploadCoordinator::new(
            FileConstraints::default(),
            Arc::new(MockObjectStore::new()),
            session().await,
            quiet(),
        );

        let file = SelectedFile::new("me.png", png(1200, 1200));
        let selection = coordinator.select(&chooser(Some(file))).await.unwrap();

        assert!(matches!(selection, Selection::Accepted(_)));
        assert_eq!(coordinator.pending().unwrap().name, "me.png");
    }

    #[tokio::test]
    async fn test_rejection_emits_single_aggregated_notice() {
        let mut notify = MockNotify::new();
        notify
            .expect_notify()
            .withf(|notice| {
                notice.severity == Severity::Error
                    && notice.message.contains("width 40px is below minimum 50px")
                    && notice.message.contains("height 30px is below minimum 50px")
            })
            .times(1)
            .return_const(());
        let coordinator = UploadCoordinator::new(
            FileConstraints::default(),
            Arc::new(MockObjectStore::new()),
            session().await,
            Arc::new(notify),
        );

        let file = SelectedFile::new("tiny.png", png(40, 30));
        let selection = coordinator.select(&chooser(Some(file))).await.unwrap();

        match selection {
            Selection::Rejected(rejection) => assert_eq!(rejection.0.len(), 2),
            other => panic!("expected rejection, got {other:?}"),
        }
        assert!(coordinator.pending().is_none());
    }

    #[tokio::test]
    async fn test_reselect_discards_previous_even_when_cancelled() {
        let coordinator = UploadCoordinator::new(
            FileConstraints::default(),
            Arc::new(MockObjectStore::new()),
            session().await,
            quiet(),
        );
        coordinator.offer(SelectedFile::new("first.png", png(100, 100)));
        assert!(coordinator.pending().is_some());

        let selection = coordinator.select(&chooser(None)).await.unwrap();
        assert_eq!(selection, Selection::Cancelled);
        assert!(coordinator.pending().is_none());
    }

    #[tokio::test]
    async fn test_rejected_violation_types() {
        let mut notify = MockNotify::new();
        notify.expect_notify().times(1).return_const(());
        let coordinator = UploadCoordinator::new(
            FileConstraints::default(),
            Arc::new(MockObjectStore::new()),
            session().await,
            Arc::new(notify),
        );
        let selection = coordinator.offer(SelectedFile::new("wide.png", png(1700, 100)));
        assert_eq!(
            selection,
            Selection::Rejected(Rejection(vec![ConstraintViolation::WidthTooLarge {
                width: 1700,
                max: 1600
            }]))
        );
    }

    #[tokio::test]
    async fn test_rejected_reselection_leaves_nothing_pending() {
        let mut notify = MockNotify::new();
        notify.expect_notify().times(1).return_const(());
        let coordinator = UploadCoordinator::new(
            FileConstraints::default(),
            Arc::new(MockObjectStore::new()),
            session().await,
            Arc::new(notify),
        );
        let accepted = coordinator.offer(SelectedFile::new("good.png", png(100, 100)));
        assert!(matches!(accepted, Selection::Accepted(_)));

        let rejected = coordinator.offer(SelectedFile::new("too_small.png", png(40, 100)));
        assert!(matches!(rejected, Selection::Rejected(_)));
        assert!(coordinator.pending().is_none());
    }

    #[tokio::test]
    async fn test_clear_if_only_clears_matching_selection() {
        let coordinator = UploadCoordinator::new(
            FileConstraints::default(),
            Arc::new(MockObjectStore::new()),
            session().await,
            quiet(),
        );
        let Selection::Accepted(first) =
            coordinator.offer(SelectedFile::new("first.png", png(100, 100)))
        else {
            panic!("first file should be accepted");
        };
        coordinator.offer(SelectedFile::new("second.png", png(100, 100)));

        assert!(!coordinator.clear_if(first.id));
        assert_eq!(coordinator.pending().unwrap().name, "second.png");
    }

    #[tokio::test]
    async fn test_upload_uses_deterministic_destination() {
        let mut store = MockObjectStore::new();
        store
            .expect_upload()
            .withf(|path, _| path.to_string() == "uid-ada/profile/me.png")
            .times(1)
            .returning(|path, _| {
                Ok(ObjectHandle {
                    path: path.to_string(),
                })
            });
        store
            .expect_public_url()
            .returning(|handle| Ok(format!("https://cdn.test/{}", handle.path)));
        let coordinator = UploadCoordinator::new(
            FileConstraints::default(),
            Arc::new(store),
            session().await,
            quiet(),
        );
        let Selection::Accepted(file) = coordinator.offer(SelectedFile::new("me.png", png(64, 64)))
        else {
            panic!("file should be accepted");
        };

        let url = coordinator.upload(&file, "profile").await.unwrap();
        assert_eq!(url, "https://cdn.test/uid-ada/profile/me.png");
    }

    #[tokio::test]
    async fn test_same_file_twice_resolves_to_same_reference() {
        let dir = tempfile::TempDir::new().unwrap();
        let coordinator = UploadCoordinator::new(
            FileConstraints::default(),
            Arc::new(LocalObjectStore::new(dir.path(), "https://cdn.test")),
            session().await,
            quiet(),
        );
        let Selection::Accepted(file) = coordinator.offer(SelectedFile::new("me.png", png(64, 64)))
        else {
            panic!("file should be accepted");
        };

        let first = coordinator.upload(&file, "profile").await.unwrap();
        let second = coordinator.upload(&file, "profile").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(
            std::fs::read_dir(dir.path().join("uid-ada/profile"))
                .unwrap()
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_upload_failure_propagates() {
        let mut store = MockObjectStore::new();
        store
            .expect_upload()
            .returning(|_, _| Err(StorageError::Transport("quota exceeded".to_string())));
        store.expect_public_url().never();
        let coordinator = UploadCoordinator::new(
            FileConstraints::default(),
            Arc::new(store),
            session().await,
            quiet(),
        );
        let Selection::Accepted(file) = coordinator.offer(SelectedFile::new("me.png", png(64, 64)))
        else {
            panic!("file should be accepted");
        };

        let err = coordinator.upload(&file, "profile").await.unwrap_err();
        assert_eq!(err.to_string(), "storage transport error: quota exceeded");
    }
}
