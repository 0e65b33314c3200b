//! User registration seam.
//!
//! There is no user store yet; [`NoopRegistry`] accepts everyone so the router
//! does not change when a real store is plugged in.

use anyhow::Result;
use async_trait::async_trait;
use teloxide::types::User;
use tracing::debug;

/// Sender identity carried by an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: u64,
    pub username: Option<String>,
    pub first_name: String,
    pub full_name: String,
    pub language_code: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.0,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            full_name: user.full_name(),
            language_code: user.language_code.clone(),
        }
    }
}

#[async_trait]
pub trait UserRegistry: Send + Sync {
    /// Record the user if not seen before
    async fn register(&self, user: &UserProfile) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRegistry;

#[async_trait]
impl UserRegistry for NoopRegistry {
    async fn register(&self, user: &UserProfile) -> Result<()> {
        debug!(user_id = user.id, "User registration skipped, no store configured");
        Ok(())
    }
}
