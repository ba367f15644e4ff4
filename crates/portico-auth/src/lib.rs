//! # portico-auth
//!
//! Clerk integration for Portico.
//!
//! Provides session-token extraction and JWKS validation (`clerk-rs`), and a
//! Backend API client (`reqwest`) for the three management calls the gate and
//! webhook synchronizer need: fetch a user, replace a user's public metadata,
//! and count a user's organization memberships.

pub mod clerk;
pub mod error;
pub mod provider;
pub mod session;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use clerk::ClerkClient;
pub use error::AuthError;
pub use provider::{IdentityProvider, ProviderUser};
pub use session::{ClerkJwksVerifier, SessionVerifier, resolve_session, session_token};
