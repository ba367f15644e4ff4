use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load portico configuration: {0}")]
    Figment(#[from] figment::Error),

    /// `--config` pointed at a file that does not exist.
    #[error("config file {} not found", path.display())]
    MissingFile { path: PathBuf },

    /// A section needed by the requested command lacks a required key.
    #[error("[{section}] is not configured: set {key} (or {env_var})")]
    NotConfigured {
        section: &'static str,
        key: &'static str,
        env_var: &'static str,
    },

    #[error("invalid {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}
