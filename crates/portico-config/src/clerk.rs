//! Clerk configuration.

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://api.clerk.com/v1";

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClerkConfig {
    /// Clerk publishable key.
    #[serde(default)]
    pub publishable_key: String,

    /// Clerk secret key. Authorizes Backend API calls and JWKS fetches.
    #[serde(default)]
    pub secret_key: String,

    /// Svix signing secret for the Clerk webhook endpoint (`whsec_...`).
    #[serde(default)]
    pub webhook_secret: String,

    /// Backend API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for ClerkConfig {
    fn default() -> Self {
        Self {
            publishable_key: String::new(),
            secret_key: String::new(),
            webhook_secret: String::new(),
            api_url: default_api_url(),
        }
    }
}

impl ClerkConfig {
    /// Check if the Backend API can be called.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        !self.secret_key.is_empty()
    }

    /// The webhook signing secret, if one is set.
    #[must_use]
    pub fn webhook_secret(&self) -> Option<&str> {
        Some(self.webhook_secret.as_str()).filter(|s| !s.is_empty())
    }

    /// Copy of this config with secrets masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            publishable_key: self.publishable_key.clone(),
            secret_key: redact(&self.secret_key),
            webhook_secret: redact(&self.webhook_secret),
            api_url: self.api_url.clone(),
        }
    }
}

fn redact(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        "********".to_string()
    }
}
