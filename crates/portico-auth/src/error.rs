use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWKS validation failed: {0}")]
    JwksValidation(String),

    #[error("clerk API error: {0}")]
    ClerkApiError(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("{0}")]
    Other(String),
}
