//! axum middleware applying the [`Gate`] to every request.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use portico_auth::{IdentityProvider, SessionVerifier, resolve_session, session_token};
use url::Url;

use crate::{Decision, Gate, GateError, RedirectTarget};

const REDIRECT_URL_PARAM: &str = "redirect_url";

#[derive(Clone)]
pub struct GateState {
    pub gate: Arc<Gate>,
    pub provider: Arc<dyn IdentityProvider>,
    pub verifier: Arc<dyn SessionVerifier>,
    /// Fixed origin for redirect URLs. `None` derives it from the request.
    pub public_url: Option<Url>,
}

impl GateState {
    /// # Errors
    ///
    /// Returns `GateError::InvalidPublicUrl` if `public_url` is set but not
    /// an absolute URL.
    pub fn new(
        gate: Gate,
        provider: Arc<dyn IdentityProvider>,
        verifier: Arc<dyn SessionVerifier>,
        public_url: Option<&str>,
    ) -> Result<Self, GateError> {
        let public_url = public_url
            .map(|raw| {
                Url::parse(raw).map_err(|e| GateError::InvalidPublicUrl {
                    url: raw.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            gate: Arc::new(gate),
            provider,
            verifier,
            public_url,
        })
    }
}

pub async fn gate_middleware(
    State(state): State<GateState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let headers = request.headers();
    let token = session_token(
        header_str(headers, header::COOKIE.as_str()),
        header_str(headers, header::AUTHORIZATION.as_str()),
    )
    .map(str::to_owned);
    let session = resolve_session(state.verifier.as_ref(), token.as_deref()).await;

    let decision = state
        .gate
        .evaluate(&path, &session, state.provider.as_ref())
        .await;

    let Decision::Redirect(target) = decision else {
        return next.run(request).await;
    };

    let original = match request_url(state.public_url.as_ref(), &request) {
        Ok(url) => url,
        Err(error) => {
            tracing::warn!(%path, %error, "cannot build redirect for request");
            return (StatusCode::BAD_REQUEST, error.to_string()).into_response();
        }
    };

    match redirect_location(&state.gate, target, &original) {
        Ok(location) => {
            tracing::debug!(
                %path,
                user_id = session.user_id.as_deref().unwrap_or("-"),
                ?target,
                %location,
                "gate redirect"
            );
            (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
        }
        Err(error) => {
            tracing::warn!(%path, %error, "cannot build redirect location");
            (StatusCode::BAD_REQUEST, error.to_string()).into_response()
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Absolute URL of the incoming request.
///
/// Uses the configured public URL as origin when present, otherwise the
/// `Host` header with `X-Forwarded-Proto` (default `http`).
fn request_url(public_url: Option<&Url>, request: &Request) -> Result<Url, GateError> {
    let base = match public_url {
        Some(url) => url.clone(),
        None => {
            let headers = request.headers();
            let host = header_str(headers, header::HOST.as_str())
                .or_else(|| request.uri().authority().map(axum::http::uri::Authority::as_str))
                .ok_or_else(|| GateError::RequestUrl("missing Host header".into()))?;
            let scheme = forwarded_scheme(header_str(headers, "x-forwarded-proto"));
            Url::parse(&format!("{scheme}://{host}"))
                .map_err(|e| GateError::RequestUrl(e.to_string()))?
        }
    };

    let path_and_query = request
        .uri()
        .path_and_query()
        .map_or("/", axum::http::uri::PathAndQuery::as_str);
    base.join(path_and_query)
        .map_err(|e| GateError::RequestUrl(e.to_string()))
}

/// Only `http` and `https` are accepted; anything else falls back to `http`.
fn forwarded_scheme(header: Option<&str>) -> &'static str {
    match header.and_then(|v| v.split(',').next()).map(str::trim) {
        Some(proto) if proto.eq_ignore_ascii_case("https") => "https",
        _ => "http",
    }
}

fn redirect_location(
    gate: &Gate,
    target: RedirectTarget,
    original: &Url,
) -> Result<Url, GateError> {
    let mut location = original
        .join(gate.target_path(target))
        .map_err(|e| GateError::RequestUrl(e.to_string()))?;
    if target == RedirectTarget::SignIn {
        location
            .query_pairs_mut()
            .append_pair(REDIRECT_URL_PARAM, original.as_str());
    }
    Ok(location)
}
