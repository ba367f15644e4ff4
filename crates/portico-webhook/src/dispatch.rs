//! Event-type dispatch table.

use std::collections::HashMap;

use async_trait::async_trait;
use portico_auth::IdentityProvider;
use portico_core::ProfileFlag;

use crate::WebhookError;
use crate::event::{
    MEMBERSHIP_CREATED, MEMBERSHIP_DELETED, MembershipData, USER_CREATED, UserData, WebhookEvent,
};

/// What a handler did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A side effect was performed; the string describes it.
    Applied(String),
    /// Nothing needed doing; the string says why.
    Skipped(String),
}

#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(
        &self,
        event: &WebhookEvent,
        provider: &dyn IdentityProvider,
    ) -> Result<Outcome, WebhookError>;
}

/// Routes verified events to handlers by their `type`.
///
/// Types without a handler are acknowledged as skipped, so the sender does
/// not retry deliveries Portico has no interest in.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: HashMap<String, Box<dyn EventHandler>>,
}

impl EventDispatcher {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The handlers for Clerk user and membership events.
    #[must_use]
    pub fn clerk() -> Self {
        Self::new()
            .with_handler(USER_CREATED, UserCreated)
            .with_handler(MEMBERSHIP_CREATED, MembershipCreated)
            .with_handler(MEMBERSHIP_DELETED, MembershipDeleted)
    }

    /// Register `handler` for `event_type`, replacing any previous entry.
    #[must_use]
    pub fn with_handler(
        mut self,
        event_type: impl Into<String>,
        handler: impl EventHandler + 'static,
    ) -> Self {
        self.handlers.insert(event_type.into(), Box::new(handler));
        self
    }

    #[must_use]
    pub fn handles(&self, event_type: &str) -> bool {
        self.handlers.contains_key(event_type)
    }

    /// Run the handler registered for the event's type.
    ///
    /// # Errors
    ///
    /// Propagates the handler's error.
    pub async fn dispatch(
        &self,
        event: &WebhookEvent,
        provider: &dyn IdentityProvider,
    ) -> Result<Outcome, WebhookError> {
        match self.handlers.get(event.event_type.as_str()) {
            Some(handler) => handler.handle(event, provider).await,
            None => Ok(Outcome::Skipped(format!(
                "no handler for '{}'",
                event.event_type
            ))),
        }
    }
}

/// The local user record a `user.created` event describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub provider_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&UserData> for NewUser {
    fn from(user: &UserData) -> Self {
        Self {
            provider_id: user.id.clone(),
            email: user.primary_email().unwrap_or_default().to_string(),
            first_name: user.first_name.clone().unwrap_or_default(),
            last_name: user.last_name.clone().unwrap_or_default(),
        }
    }
}

/// `user.created`: there is no local user store, so the record is logged.
///
/// Always succeeds; fields that cannot be read are logged empty.
pub struct UserCreated;

#[async_trait]
impl EventHandler for UserCreated {
    async fn handle(
        &self,
        event: &WebhookEvent,
        _provider: &dyn IdentityProvider,
    ) -> Result<Outcome, WebhookError> {
        let data = event.data_as::<UserData>().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "user.created data not understood; logging empty record");
            UserData::default()
        });
        let user = NewUser::from(&data);
        tracing::info!(
            user_id = %user.provider_id,
            email = %user.email,
            first_name = %user.first_name,
            last_name = %user.last_name,
            "user created"
        );
        Ok(Outcome::Applied(format!("logged new user {}", user.provider_id)))
    }
}

/// `organizationMembership.created`: mark the member as having an organization.
pub struct MembershipCreated;

#[async_trait]
impl EventHandler for MembershipCreated {
    async fn handle(
        &self,
        event: &WebhookEvent,
        provider: &dyn IdentityProvider,
    ) -> Result<Outcome, WebhookError> {
        let data: MembershipData = event.data_as()?;
        let Some(user_id) = data.user_id() else {
            return Ok(Outcome::Skipped("membership event without user".into()));
        };
        let org_id = data.organization_id().ok_or_else(|| {
            WebhookError::EventData(format!("{MEMBERSHIP_CREATED}: missing organization"))
        })?;

        provider
            .update_profile_flag(user_id, &ProfileFlag::member_of(org_id))
            .await?;

        tracing::info!(%user_id, %org_id, "user marked as having organization membership");
        Ok(Outcome::Applied(format!(
            "set hasOrganization=true for {user_id} (organization {org_id})"
        )))
    }
}

/// `organizationMembership.deleted`: clear the flag once no memberships remain.
///
/// The count and the write are two separate provider calls with no
/// transaction between them. If a membership is added after the count and its
/// `created` event is applied before this write, the write clears a flag that
/// should stay set. The flag stays wrong until the next membership event.
pub struct MembershipDeleted;

#[async_trait]
impl EventHandler for MembershipDeleted {
    async fn handle(
        &self,
        event: &WebhookEvent,
        provider: &dyn IdentityProvider,
    ) -> Result<Outcome, WebhookError> {
        let data: MembershipData = event.data_as()?;
        let Some(user_id) = data.user_id() else {
            return Ok(Outcome::Skipped("membership event without user".into()));
        };

        let remaining = provider.membership_count(user_id).await?;
        if remaining > 0 {
            tracing::debug!(%user_id, remaining, "user still has memberships; flag unchanged");
            return Ok(Outcome::Skipped(format!(
                "{user_id} still belongs to {remaining} organization(s)"
            )));
        }

        provider
            .update_profile_flag(user_id, &ProfileFlag::cleared())
            .await?;

        tracing::info!(%user_id, "user marked as having no organization memberships");
        Ok(Outcome::Applied(format!("set hasOrganization=false for {user_id}")))
    }
}
