//! Session-token extraction and Clerk JWKS validation.

use std::sync::Arc;

use async_trait::async_trait;
use clerk_rs::ClerkConfiguration;
use clerk_rs::clerk::Clerk;
use clerk_rs::validators::authorizer::validate_jwt;
use clerk_rs::validators::jwks::MemoryCacheJwksProvider;
use portico_core::Session;

use crate::AuthError;

/// Cookie Clerk's frontend SDKs set for same-origin requests.
pub const SESSION_COOKIE: &str = "__session";

/// Turns a raw session token into a [`Session`].
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Session, AuthError>;
}

/// Validates Clerk session JWTs against the instance's JWKS.
///
/// The `MemoryCacheJwksProvider` caches public keys for an hour; one
/// verifier is built at startup and shared by every request.
#[derive(Clone)]
pub struct ClerkJwksVerifier {
    jwks: Arc<MemoryCacheJwksProvider>,
}

impl ClerkJwksVerifier {
    #[must_use]
    pub fn new(secret_key: &str) -> Self {
        let config = ClerkConfiguration::new(None, None, Some(secret_key.to_string()), None);
        Self {
            jwks: Arc::new(MemoryCacheJwksProvider::new(Clerk::new(config))),
        }
    }
}

#[async_trait]
impl SessionVerifier for ClerkJwksVerifier {
    async fn verify(&self, token: &str) -> Result<Session, AuthError> {
        let jwt = validate_jwt(token, Arc::clone(&self.jwks))
            .await
            .map_err(|e| AuthError::JwksValidation(e.to_string()))?;

        Ok(Session {
            user_id: Some(jwt.sub),
            org_id: jwt.org.map(|org| org.id),
        })
    }
}

/// Pick the session token out of a request's headers.
///
/// An `Authorization: Bearer` token wins over the `__session` cookie.
#[must_use]
pub fn session_token<'a>(
    cookie_header: Option<&'a str>,
    authorization: Option<&'a str>,
) -> Option<&'a str> {
    if let Some(token) = authorization
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
    {
        return Some(token);
    }

    cookie_header?
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Resolve a request's session, falling back to anonymous.
///
/// A token that fails validation is treated the same as no token: the caller
/// is anonymous and the gate will send them to sign-in where needed.
pub async fn resolve_session(verifier: &dyn SessionVerifier, token: Option<&str>) -> Session {
    let Some(token) = token else {
        return Session::anonymous();
    };

    match verifier.verify(token).await {
        Ok(session) => session,
        Err(error) => {
            tracing::debug!(%error, "session token rejected; treating caller as anonymous");
            Session::anonymous()
        }
    }
}
