use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use portico_auth::AuthError;
use thiserror::Error;

use crate::verify::VerifyError;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Missing webhook secret")]
    MissingSecret,

    #[error("Invalid webhook secret: {0}")]
    InvalidSecret(String),

    #[error("Missing svix headers")]
    MissingHeaders,

    #[error("Error verifying webhook")]
    Verification(#[source] VerifyError),

    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),

    /// A verified event whose `data` a handler could not apply.
    #[error("event could not be applied: {0}")]
    EventData(String),

    #[error("provider update failed: {0}")]
    Provider(#[from] AuthError),
}

impl WebhookError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Provider(_) | Self::EventData(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        match self {
            // Processing failures get the structured body; the sender may retry.
            Self::Provider(_) | Self::EventData(_) => (
                self.status(),
                Json(serde_json::json!({ "success": false })),
            )
                .into_response(),
            other => (other.status(), other.to_string()).into_response(),
        }
    }
}
