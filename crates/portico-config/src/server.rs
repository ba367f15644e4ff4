//! HTTP server configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Absolute base URL the app is reached at (e.g. `https://app.example.com`).
    /// When empty, redirect URLs are built from the request's `Host` header.
    #[serde(default)]
    pub public_url: String,

    /// Directory of application pages served behind the gate.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: String::new(),
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn public_url(&self) -> Option<&str> {
        Some(self.public_url.as_str()).filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert!(config.public_url().is_none());
        assert!(config.static_dir.is_none());
    }
}
