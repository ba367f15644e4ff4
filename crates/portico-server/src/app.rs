use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::routing::post;
use portico_auth::{ClerkClient, ClerkJwksVerifier, IdentityProvider, SessionVerifier};
use portico_config::{ClerkConfig, PorticoConfig};
use portico_gate::{Gate, GateError, GateState, gate_middleware};
use portico_webhook::{EventDispatcher, WEBHOOK_PATH, WebhookState, clerk_webhook};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// The Clerk-facing collaborators the router needs.
#[derive(Clone)]
pub struct Services {
    pub provider: Arc<dyn IdentityProvider>,
    pub verifier: Arc<dyn SessionVerifier>,
}

impl Services {
    /// Live Clerk Backend API client and JWKS verifier.
    #[must_use]
    pub fn clerk(config: &ClerkConfig) -> Self {
        Self {
            provider: Arc::new(ClerkClient::new(
                config.api_url.as_str(),
                config.secret_key.as_str(),
            )),
            verifier: Arc::new(ClerkJwksVerifier::new(&config.secret_key)),
        }
    }
}

/// Build the application router.
///
/// Every request, the webhook endpoint included, passes through the gate;
/// the default policy lists `/api/webhooks` as exempt. Requests the gate
/// allows are served from `server.static_dir` when configured.
///
/// # Errors
///
/// Returns `GateError::InvalidPublicUrl` if `server.public_url` does not parse.
pub fn router(config: &PorticoConfig, services: Services) -> Result<Router, GateError> {
    let gate_state = GateState::new(
        Gate::from_config(&config.gate),
        Arc::clone(&services.provider),
        services.verifier,
        config.server.public_url(),
    )?;
    let webhook_state = WebhookState::new(
        config.clerk.webhook_secret(),
        EventDispatcher::clerk(),
        services.provider,
    );

    let webhooks = Router::new()
        .route(WEBHOOK_PATH, post(clerk_webhook))
        .with_state(webhook_state);

    let pages = match &config.server.static_dir {
        Some(dir) => Router::new().fallback_service(ServeDir::new(dir)),
        None => Router::new().fallback(|| async { StatusCode::NOT_FOUND }),
    };

    Ok(webhooks
        .merge(pages)
        .layer(from_fn_with_state(gate_state, gate_middleware))
        .layer(TraceLayer::new_for_http()))
}
