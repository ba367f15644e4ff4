use thiserror::Error;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("invalid public URL '{url}': {reason}")]
    InvalidPublicUrl { url: String, reason: String },

    #[error("cannot build request URL: {0}")]
    RequestUrl(String),
}
