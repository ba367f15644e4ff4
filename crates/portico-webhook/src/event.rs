//! Clerk webhook payloads.
//!
//! Only the fields Portico reads are modeled; everything else in `data` is
//! ignored.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::WebhookError;

pub const USER_CREATED: &str = "user.created";
pub const MEMBERSHIP_CREATED: &str = "organizationMembership.created";
pub const MEMBERSHIP_DELETED: &str = "organizationMembership.deleted";

/// The envelope every Clerk delivery shares.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: Value,
}

impl WebhookEvent {
    /// Parse a verified request body.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::InvalidPayload` if the body is not an event envelope.
    pub fn parse(body: &[u8]) -> Result<Self, WebhookError> {
        serde_json::from_slice(body).map_err(|e| WebhookError::InvalidPayload(e.to_string()))
    }

    /// Decode `data` into an event-specific shape.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::EventData` naming the event type on mismatch.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<T, WebhookError> {
        T::deserialize(&self.data)
            .map_err(|e| WebhookError::EventData(format!("{}: {e}", self.event_type)))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailAddress {
    pub id: String,
    pub email_address: String,
}

/// `data` of a `user.created` event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    pub primary_email_address_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserData {
    #[must_use]
    pub fn primary_email(&self) -> Option<&str> {
        let primary = self.primary_email_address_id.as_deref()?;
        self.email_addresses
            .iter()
            .find(|email| email.id == primary)
            .map(|email| email.email_address.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationRef {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublicUserData {
    pub user_id: Option<String>,
}

/// `data` of an `organizationMembership.*` event.
#[derive(Debug, Clone, Deserialize)]
pub struct MembershipData {
    pub organization: Option<OrganizationRef>,
    pub public_user_data: Option<PublicUserData>,
}

impl MembershipData {
    /// The member's user ID, if the event carries one.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.public_user_data
            .as_ref()?
            .user_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }

    #[must_use]
    pub fn organization_id(&self) -> Option<&str> {
        self.organization.as_ref().map(|org| org.id.as_str())
    }
}
