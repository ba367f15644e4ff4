//! # portico-config
//!
//! Layered configuration loading for Portico using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PORTICO_*` prefix, `__` as separator)
//! 2. Conventional Clerk variables (`CLERK_SECRET_KEY`, `CLERK_PUBLISHABLE_KEY`,
//!    `CLERK_WEBHOOK_SECRET`)
//! 3. An explicit `--config` file
//! 4. Project-level `portico.toml`
//! 5. User-level `~/.config/portico/config.toml`
//! 6. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `PORTICO_CLERK__SECRET_KEY` -> `clerk.secret_key`,
//! `PORTICO_SERVER__PORT` -> `server.port`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use portico_config::PorticoConfig;
//!
//! let config = PorticoConfig::load_with_dotenv(None).expect("config");
//! if config.clerk.webhook_secret().is_none() {
//!     eprintln!("webhook deliveries will be rejected");
//! }
//! ```

mod clerk;
mod error;
mod gate;
mod server;

pub use clerk::{ClerkConfig, DEFAULT_API_URL};
pub use error::ConfigError;
pub use gate::GateConfig;
pub use server::ServerConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const PROJECT_CONFIG_FILE: &str = "portico.toml";

/// Unprefixed variables the Clerk SDKs conventionally read.
const CLERK_ENV_VARS: &[&str] = &[
    "CLERK_SECRET_KEY",
    "CLERK_PUBLISHABLE_KEY",
    "CLERK_WEBHOOK_SECRET",
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PorticoConfig {
    #[serde(default)]
    pub clerk: ClerkConfig,
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl PorticoConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingFile` if the explicit file does not exist,
    /// `ConfigError::Figment` if a source fails to parse, or
    /// `ConfigError::InvalidValue` if the gate paths are malformed.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit
            && !path.exists()
        {
            return Err(ConfigError::MissingFile {
                path: path.to_path_buf(),
            });
        }
        let config: Self = Self::figment(explicit).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        // A missing .env is not an error.
        let _ = dotenvy::dotenv();
        Self::load(explicit)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    #[must_use]
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(PROJECT_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(
                Env::raw().only(CLERK_ENV_VARS).map(|key| {
                    key.as_str()
                        .to_ascii_lowercase()
                        .replacen("clerk_", "clerk.", 1)
                        .into()
                }),
            )
            .merge(Env::prefixed("PORTICO_").split("__"))
    }

    /// Check values figment cannot type-check.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let gate = &self.gate;
        for (field, path) in [
            ("gate.sign_in_path", &gate.sign_in_path),
            ("gate.dashboard_path", &gate.dashboard_path),
            ("gate.onboarding_path", &gate.onboarding_path),
        ] {
            require_absolute_path(field, path)?;
        }
        for prefix in &gate.exempt_prefixes {
            require_absolute_path("gate.exempt_prefixes", prefix)?;
        }
        for prefix in &gate.public_prefixes {
            require_absolute_path("gate.public_prefixes", prefix)?;
        }
        for prefix in &gate.always_gated_prefixes {
            require_absolute_path("gate.always_gated_prefixes", prefix)?;
        }
        if let Some(ext) = gate.static_extensions.iter().find(|e| e.starts_with('.')) {
            return Err(ConfigError::InvalidValue {
                field: "gate.static_extensions".into(),
                reason: format!("'{ext}' should be given without a leading dot"),
            });
        }
        Ok(())
    }

    /// Require the Clerk secret key for Backend API calls.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` for the `clerk` section.
    pub fn require_clerk(&self) -> Result<&ClerkConfig, ConfigError> {
        if self.clerk.is_configured() {
            Ok(&self.clerk)
        } else {
            Err(ConfigError::NotConfigured {
                section: "clerk",
                key: "secret_key",
                env_var: "CLERK_SECRET_KEY",
            })
        }
    }

    /// Copy of the config with secrets masked, for `portico config`.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            clerk: self.clerk.redacted(),
            ..self.clone()
        }
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("portico").join("config.toml"))
    }
}

fn require_absolute_path(field: &str, path: &str) -> Result<(), ConfigError> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field: field.into(),
            reason: format!("'{path}' must start with '/'"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PorticoConfig::default();
        assert!(!config.clerk.is_configured());
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn relative_gate_path_is_rejected() {
        let mut config = PorticoConfig::default();
        config.gate.dashboard_path = "dashboard".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("gate.dashboard_path"));
    }

    #[test]
    fn dotted_extension_is_rejected() {
        let mut config = PorticoConfig::default();
        config.gate.static_extensions.push(".png".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn relative_always_gated_prefix_is_rejected() {
        let mut config = PorticoConfig::default();
        config.gate.always_gated_prefixes.push("api".into());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("gate.always_gated_prefixes"));
    }

    #[test]
    fn require_clerk_fails_without_secret() {
        let config = PorticoConfig::default();
        assert!(matches!(
            config.require_clerk(),
            Err(ConfigError::NotConfigured { section: "clerk", .. })
        ));
    }
}
