use async_trait::async_trait;
use portico_core::ProfileFlag;
use serde::Deserialize;

use crate::AuthError;

/// A user record as returned by the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderUser {
    pub id: String,
    #[serde(default)]
    pub public_metadata: serde_json::Value,
}

impl ProviderUser {
    #[must_use]
    pub fn profile_flag(&self) -> ProfileFlag {
        ProfileFlag::from_public_metadata(&self.public_metadata)
    }
}

/// Management operations Portico performs against the identity provider.
///
/// Implemented by [`crate::ClerkClient`] for production and by
/// `testing::InMemoryProvider` for tests.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fetch a user by ID.
    async fn get_user(&self, user_id: &str) -> Result<ProviderUser, AuthError>;

    /// Replace the user's public metadata with the given flag.
    async fn update_profile_flag(&self, user_id: &str, flag: &ProfileFlag)
    -> Result<(), AuthError>;

    /// Total number of organizations the user currently belongs to.
    async fn membership_count(&self, user_id: &str) -> Result<u64, AuthError>;

    /// Read the cached organization flag from the user's public metadata.
    async fn profile_flag(&self, user_id: &str) -> Result<ProfileFlag, AuthError> {
        Ok(self.get_user(user_id).await?.profile_flag())
    }
}
