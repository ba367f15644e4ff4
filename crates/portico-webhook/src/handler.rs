//! The `POST /api/webhooks/clerk` endpoint.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use portico_auth::IdentityProvider;

use crate::verify::{ID_HEADER, SIGNATURE_HEADER, SvixHeaders, TIMESTAMP_HEADER, Webhook};
use crate::{EventDispatcher, Outcome, WebhookError, WebhookEvent};

pub const WEBHOOK_PATH: &str = "/api/webhooks/clerk";

#[derive(Clone)]
pub struct WebhookState {
    /// Signing secret; `None` rejects every delivery.
    pub secret: Option<Arc<str>>,
    pub dispatcher: Arc<EventDispatcher>,
    pub provider: Arc<dyn IdentityProvider>,
}

impl WebhookState {
    #[must_use]
    pub fn new(
        secret: Option<&str>,
        dispatcher: EventDispatcher,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            secret: secret.map(Arc::from),
            dispatcher: Arc::new(dispatcher),
            provider,
        }
    }
}

pub async fn clerk_webhook(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match process(&state, &headers, &body).await {
        Ok(outcome) => {
            match &outcome {
                Outcome::Applied(detail) => tracing::debug!(%detail, "webhook applied"),
                Outcome::Skipped(reason) => tracing::debug!(%reason, "webhook skipped"),
            }
            Json(serde_json::json!({ "success": true })).into_response()
        }
        Err(error) => {
            match &error {
                WebhookError::Provider(source) => {
                    tracing::error!(%source, "webhook provider update failed");
                }
                WebhookError::EventData(detail) => {
                    tracing::error!(%detail, "webhook event could not be applied");
                }
                WebhookError::MissingSecret | WebhookError::InvalidSecret(_) => {
                    tracing::error!(%error, "webhook signing secret misconfigured");
                }
                WebhookError::Verification(source) => {
                    tracing::warn!(%source, "webhook signature rejected");
                }
                other => tracing::warn!(error = %other, "webhook rejected"),
            }
            error.into_response()
        }
    }
}

/// Verify, parse, and dispatch one delivery.
///
/// Checks run in a fixed order: secret, headers, signature, payload. Each
/// failure stops processing before the next check.
async fn process(
    state: &WebhookState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Outcome, WebhookError> {
    let secret = state.secret.as_deref().ok_or(WebhookError::MissingSecret)?;

    let svix = svix_headers(headers).ok_or(WebhookError::MissingHeaders)?;

    let webhook =
        Webhook::new(secret).map_err(|e| WebhookError::InvalidSecret(e.to_string()))?;
    webhook
        .verify(&svix, body)
        .map_err(WebhookError::Verification)?;

    let event = WebhookEvent::parse(body)?;
    tracing::debug!(event_type = %event.event_type, svix_id = %svix.id, "webhook verified");

    state
        .dispatcher
        .dispatch(&event, state.provider.as_ref())
        .await
}

fn svix_headers(headers: &HeaderMap) -> Option<SvixHeaders<'_>> {
    let get = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    };
    Some(SvixHeaders {
        id: get(ID_HEADER)?,
        timestamp: get(TIMESTAMP_HEADER)?,
        signature: get(SIGNATURE_HEADER)?,
    })
}
