//! In-memory stand-ins for Clerk, for tests in this and dependent crates.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use portico_core::{ProfileFlag, Session};

use crate::{AuthError, IdentityProvider, ProviderUser, SessionVerifier};

#[derive(Debug, Clone, Default)]
struct UserRecord {
    public_metadata: serde_json::Value,
    memberships: u64,
}

/// Identity provider backed by a map, with switchable failures.
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    users: Mutex<HashMap<String, UserRecord>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    get_calls: AtomicUsize,
    update_calls: AtomicUsize,
}

impl InMemoryProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user with the given flag and membership count.
    #[must_use]
    pub fn with_user(self, user_id: &str, flag: &ProfileFlag, memberships: u64) -> Self {
        self.lock().insert(
            user_id.to_string(),
            UserRecord {
                public_metadata: flag.to_public_metadata(),
                memberships,
            },
        );
        self
    }

    /// Add a user whose public metadata is empty.
    #[must_use]
    pub fn with_bare_user(self, user_id: &str, memberships: u64) -> Self {
        self.lock().insert(
            user_id.to_string(),
            UserRecord {
                public_metadata: serde_json::json!({}),
                memberships,
            },
        );
        self
    }

    /// Make `get_user` and `membership_count` fail.
    #[must_use]
    pub fn failing_reads(self) -> Self {
        self.fail_reads.store(true, Ordering::SeqCst);
        self
    }

    /// Make `update_profile_flag` fail.
    #[must_use]
    pub fn failing_writes(self) -> Self {
        self.fail_writes.store(true, Ordering::SeqCst);
        self
    }

    /// Current flag for a user, if the user exists.
    #[must_use]
    pub fn flag(&self, user_id: &str) -> Option<ProfileFlag> {
        self.lock()
            .get(user_id)
            .map(|u| ProfileFlag::from_public_metadata(&u.public_metadata))
    }

    /// Raw public metadata for a user.
    #[must_use]
    pub fn metadata(&self, user_id: &str) -> Option<serde_json::Value> {
        self.lock().get(user_id).map(|u| u.public_metadata.clone())
    }

    #[must_use]
    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, UserRecord>> {
        self.users
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn check_reads(&self) -> Result<(), AuthError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(AuthError::ClerkApiError("simulated read failure".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl IdentityProvider for InMemoryProvider {
    async fn get_user(&self, user_id: &str) -> Result<ProviderUser, AuthError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reads()?;
        self.lock()
            .get(user_id)
            .map(|u| ProviderUser {
                id: user_id.to_string(),
                public_metadata: u.public_metadata.clone(),
            })
            .ok_or_else(|| AuthError::UserNotFound(user_id.to_string()))
    }

    async fn update_profile_flag(
        &self,
        user_id: &str,
        flag: &ProfileFlag,
    ) -> Result<(), AuthError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AuthError::ClerkApiError("simulated write failure".into()));
        }
        let mut users = self.lock();
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| AuthError::UserNotFound(user_id.to_string()))?;
        user.public_metadata = flag.to_public_metadata();
        Ok(())
    }

    async fn membership_count(&self, user_id: &str) -> Result<u64, AuthError> {
        self.check_reads()?;
        self.lock()
            .get(user_id)
            .map(|u| u.memberships)
            .ok_or_else(|| AuthError::UserNotFound(user_id.to_string()))
    }
}

/// Session verifier that accepts a fixed set of tokens.
#[derive(Debug, Clone, Default)]
pub struct StaticVerifier {
    tokens: HashMap<String, Session>,
}

impl StaticVerifier {
    #[must_use]
    pub fn with_token(mut self, token: &str, session: Session) -> Self {
        self.tokens.insert(token.to_string(), session);
        self
    }
}

#[async_trait]
impl SessionVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<Session, AuthError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| AuthError::JwksValidation("unknown token".into()))
    }
}
