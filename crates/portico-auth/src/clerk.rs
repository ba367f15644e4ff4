//! Clerk Backend API client.
//!
//! Calls the Backend API directly via `reqwest` (clerk-rs doesn't cover the
//! membership listing we need). Requires `config.clerk.secret_key`.

use async_trait::async_trait;
use portico_core::ProfileFlag;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::{AuthError, IdentityProvider, ProviderUser};

#[derive(Debug, Clone)]
pub struct ClerkClient {
    http: reqwest::Client,
    api_url: String,
    secret_key: String,
}

impl ClerkClient {
    #[must_use]
    pub fn new(api_url: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        }
    }

    fn user_url(&self, user_id: &str) -> String {
        format!("{}/users/{}", self.api_url, urlencoding::encode(user_id))
    }
}

/// Turn a non-2xx response into `AuthError`, keeping the body for diagnostics.
async fn check_status(
    resp: reqwest::Response,
    action: &str,
    user_id: &str,
) -> Result<reqwest::Response, AuthError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(AuthError::UserNotFound(user_id.to_string()));
    }
    let body = resp.text().await.unwrap_or_default();
    Err(AuthError::ClerkApiError(format!(
        "{action}: HTTP {status}: {body}"
    )))
}

#[async_trait]
impl IdentityProvider for ClerkClient {
    async fn get_user(&self, user_id: &str) -> Result<ProviderUser, AuthError> {
        let resp = self
            .http
            .get(self.user_url(user_id))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| AuthError::ClerkApiError(format!("get user: {e}")))?;

        check_status(resp, "get user", user_id)
            .await?
            .json()
            .await
            .map_err(|e| AuthError::ClerkApiError(format!("parse user: {e}")))
    }

    async fn update_profile_flag(
        &self,
        user_id: &str,
        flag: &ProfileFlag,
    ) -> Result<(), AuthError> {
        let resp = self
            .http
            .patch(self.user_url(user_id))
            .bearer_auth(&self.secret_key)
            .json(&serde_json::json!({
                "public_metadata": flag.to_public_metadata(),
            }))
            .send()
            .await
            .map_err(|e| AuthError::ClerkApiError(format!("update user: {e}")))?;

        check_status(resp, "update user", user_id).await?;
        Ok(())
    }

    async fn membership_count(&self, user_id: &str) -> Result<u64, AuthError> {
        #[derive(Deserialize)]
        struct MembershipList {
            total_count: u64,
        }

        // Only the total is needed; one record keeps the payload small.
        let url = format!("{}/organization_memberships?limit=1", self.user_url(user_id));
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| AuthError::ClerkApiError(format!("list memberships: {e}")))?;

        let list: MembershipList = check_status(resp, "list memberships", user_id)
            .await?
            .json()
            .await
            .map_err(|e| AuthError::ClerkApiError(format!("parse memberships: {e}")))?;
        Ok(list.total_count)
    }
}
