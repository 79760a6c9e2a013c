//! Identity provider backed by a JSON file on this machine

use super::traits::{IdentityProvider, UserProfile};
use crate::error::IdentityError;
use async_trait::async_trait;
use chrono::Utc;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LocalAccount {
    user: UserProfile,
    signed_in: bool,
}

/// Single local user persisted as JSON
pub struct LocalIdentityProvider {
    path: PathBuf,
    // Serializes read-modify-write cycles on the account file.
    lock: Mutex<()>,
}

impl LocalIdentityProvider {
    /// Default account file location
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "profile-tui", "profile-tui")
            .map(|dirs| dirs.data_dir().join("identity.json"))
    }

    /// Open the account at `path` and sign it in, creating it on first use
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, IdentityError> {
        let provider = Self {
            path: path.into(),
            lock: Mutex::new(()),
        };
        let _guard = provider.lock.lock().await;
        let mut account = match provider.load().await? {
            Some(account) => account,
            None => {
                let account = LocalAccount {
                    user: new_local_user(),
                    signed_in: true,
                };
                tracing::info!(uid = %account.user.uid, path = %provider.path.display(), "created local identity");
                account
            }
        };
        account.signed_in = true;
        provider.store(&account).await?;
        drop(_guard);
        Ok(provider)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Option<LocalAccount>, IdentityError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => serde_json::from_str(&content)
                .map(Some)
                .map_err(|e| IdentityError::Store(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(IdentityError::Store(e.to_string())),
        }
    }

    async fn store(&self, account: &LocalAccount) -> Result<(), IdentityError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| IdentityError::Store(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(account)
            .map_err(|e| IdentityError::Store(e.to_string()))?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| IdentityError::Store(e.to_string()))
    }

    async fn signed_in_account(&self) -> Result<LocalAccount, IdentityError> {
        match self.load().await? {
            Some(account) if account.signed_in => Ok(account),
            _ => Err(IdentityError::SignedOut),
        }
    }

    async fn mutate<F>(&self, change: F) -> Result<(), IdentityError>
    where
        F: FnOnce(&mut UserProfile) + Send,
    {
        let _guard = self.lock.lock().await;
        let mut account = self.signed_in_account().await?;
        change(&mut account.user);
        account.user.updated_at = Some(Utc::now());
        self.store(&account).await
    }
}

fn new_local_user() -> UserProfile {
    let login = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "user".to_string());
    UserProfile {
        uid: Uuid::new_v4().to_string(),
        display_name: String::new(),
        email: format!("{login}@localhost"),
        avatar_url: None,
        updated_at: None,
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn current_user(&self) -> Result<Option<UserProfile>, IdentityError> {
        Ok(self
            .load()
            .await?
            .filter(|account| account.signed_in)
            .map(|account| account.user))
    }

    async fn update_display_name(&self, name: &str) -> Result<(), IdentityError> {
        let name = name.to_string();
        self.mutate(move |user| user.display_name = name).await
    }

    async fn update_avatar_reference(&self, url: &str) -> Result<(), IdentityError> {
        let url = url.to_string();
        self.mutate(move |user| user.avatar_url = Some(url)).await
    }

    async fn reload(&self) -> Result<UserProfile, IdentityError> {
        self.signed_in_account().await.map(|account| account.user)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        let _guard = self.lock.lock().await;
        if let Some(mut account) = self.load().await? {
            account.signed_in = false;
            self.store(&account).await?;
        }
        Ok(())
    }
}
