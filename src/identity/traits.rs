//! Trait abstraction for the identity provider to enable mocking in tests

use crate::error::IdentityError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cached identity of the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Identity provider operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, if any
    async fn current_user(&self) -> Result<Option<UserProfile>, IdentityError>;

    /// Change the display name of the signed-in user
    async fn update_display_name(&self, name: &str) -> Result<(), IdentityError>;

    /// Point the signed-in user's avatar at `url`
    async fn update_avatar_reference(&self, url: &str) -> Result<(), IdentityError>;

    /// Fetch the identity again after a mutation
    async fn reload(&self) -> Result<UserProfile, IdentityError>;

    async fn sign_out(&self) -> Result<(), IdentityError>;
}
