//! Explicit session context threaded to the pipeline and the coordinator

use super::traits::{IdentityProvider, UserProfile};
use crate::error::IdentityError;
use std::sync::{Arc, RwLock};

struct SessionInner {
    provider: Arc<dyn IdentityProvider>,
    // None once signed out.
    user: RwLock<Option<UserProfile>>,
}

/// A signed-in session: acquired at start, invalidated at sign-out
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

impl Session {
    /// Start a session for the provider's current user
    pub async fn acquire(provider: Arc<dyn IdentityProvider>) -> Result<Self, IdentityError> {
        let user = provider
            .current_user()
            .await?
            .ok_or(IdentityError::SignedOut)?;
        tracing::info!(uid = %user.uid, "session acquired");
        Ok(Self {
            inner: Arc::new(SessionInner {
                provider,
                user: RwLock::new(Some(user)),
            }),
        })
    }

    /// Cached identity; `SignedOut` after [`sign_out`](Self::sign_out)
    pub fn user(&self) -> Result<UserProfile, IdentityError> {
        self.read().clone().ok_or(IdentityError::SignedOut)
    }

    pub fn uid(&self) -> Result<String, IdentityError> {
        self.user().map(|user| user.uid)
    }

    pub fn is_active(&self) -> bool {
        self.read().is_some()
    }

    pub async fn update_display_name(&self, name: &str) -> Result<(), IdentityError> {
        self.ensure_active()?;
        self.inner.provider.update_display_name(name).await
    }

    pub async fn update_avatar_reference(&self, url: &str) -> Result<(), IdentityError> {
        self.ensure_active()?;
        self.inner.provider.update_avatar_reference(url).await
    }

    /// Refresh the cached identity from the provider
    pub async fn reload(&self) -> Result<UserProfile, IdentityError> {
        self.ensure_active()?;
        let user = self.inner.provider.reload().await?;
        *self.write() = Some(user.clone());
        Ok(user)
    }

    pub async fn sign_out(&self) -> Result<(), IdentityError> {
        self.inner.provider.sign_out().await?;
        *self.write() = None;
        tracing::info!("session invalidated");
        Ok(())
    }

    fn ensure_active(&self) -> Result<(), IdentityError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(IdentityError::SignedOut)
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Option<UserProfile>> {
        self.inner
            .user
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Option<UserProfile>> {
        self.inner
            .user
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::MockIdentityProvider;
    use tokio_test::{assert_err, assert_ok};

    fn ada() -> UserProfile {
        UserProfile {
            uid: "uid-ada".to_string(),
            display_name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            avatar_url: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_acquire_requires_signed_in_user() {
        let mut provider = MockIdentityProvider::new();
        provider.expect_current_user().returning(|| Ok(None));

        let result = Session::acquire(Arc::new(provider)).await;
        assert!(matches!(result, Err(IdentityError::SignedOut)));
    }

    #[tokio::test]
    async fn test_acquire_caches_user() {
        let mut provider = MockIdentityProvider::new();
        provider.expect_current_user().returning(|| Ok(Some(ada())));

        let session = Session::acquire(Arc::new(provider)).await.unwrap();
        assert!(session.is_active());
        assert_eq!(session.uid().unwrap(), "uid-ada");
    }

    #[tokio::test]
    async fn test_reload_refreshes_cache() {
        let mut provider = MockIdentityProvider::new();
        provider.expect_current_user().returning(|| Ok(Some(ada())));
        provider.expect_reload().times(1).returning(|| {
            Ok(UserProfile {
                avatar_url: Some("https://cdn.test/uid-ada/profile/a.png".to_string()),
                ..ada()
            })
        });

        let session = Session::acquire(Arc::new(provider)).await.unwrap();
        assert_ok!(session.reload().await);
        assert_eq!(
            session.user().unwrap().avatar_url.as_deref(),
            Some("https://cdn.test/uid-ada/profile/a.png")
        );
    }

    #[tokio::test]
    async fn test_signed_out_session_rejects_mutations() {
        let mut provider = MockIdentityProvider::new();
        provider.expect_current_user().returning(|| Ok(Some(ada())));
        provider.expect_sign_out().times(1).returning(|| Ok(()));
        provider.expect_update_display_name().never();

        let session = Session::acquire(Arc::new(provider)).await.unwrap();
        assert_ok!(session.sign_out().await);

        assert!(!session.is_active());
        assert_err!(session.user());
        assert!(matches!(
            session.update_display_name("Grace").await,
            Err(IdentityError::SignedOut)
        ));
    }

    #[tokio::test]
    async fn test_provider_errors_propagate() {
        let mut provider = MockIdentityProvider::new();
        provider.expect_current_user().returning(|| Ok(Some(ada())));
        provider
            .expect_update_avatar_reference()
            .returning(|_| Err(IdentityError::Network("timeout".to_string())));

        let session = Session::acquire(Arc::new(provider)).await.unwrap();
        let err = session.update_avatar_reference("u").await.unwrap_err();
        assert_eq!(err.to_string(), "network error: timeout");
    }
}
