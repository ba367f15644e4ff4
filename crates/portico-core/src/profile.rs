//! The organization-membership flag cached in Clerk public metadata.
//!
//! Written only by the webhook synchronizer, read by the gate when the
//! session carries no active organization. The flag is maintained
//! best-effort from membership events and can drift from Clerk's actual
//! membership records.

use serde_json::{Value, json};

const HAS_ORGANIZATION_KEY: &str = "hasOrganization";
const ORGANIZATION_ID_KEY: &str = "organizationId";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFlag {
    pub has_organization: bool,
    /// Organization the user was last added to. `None` once the last
    /// membership is removed.
    pub organization_id: Option<String>,
}

impl ProfileFlag {
    /// Flag written when a user joins an organization.
    #[must_use]
    pub fn member_of(org_id: impl Into<String>) -> Self {
        Self {
            has_organization: true,
            organization_id: Some(org_id.into()),
        }
    }

    /// Flag written when a user's last membership is removed.
    #[must_use]
    pub const fn cleared() -> Self {
        Self {
            has_organization: false,
            organization_id: None,
        }
    }

    /// Read the flag from a user's `public_metadata` object.
    ///
    /// Only a literal JSON `true` counts as membership. Missing keys, other
    /// types, or a non-object metadata value all read as "no organization".
    #[must_use]
    pub fn from_public_metadata(metadata: &Value) -> Self {
        Self {
            has_organization: metadata.get(HAS_ORGANIZATION_KEY) == Some(&Value::Bool(true)),
            organization_id: metadata
                .get(ORGANIZATION_ID_KEY)
                .and_then(Value::as_str)
                .map(str::to_owned),
        }
    }

    /// Render the flag as the `public_metadata` object sent to Clerk.
    ///
    /// `organizationId` is always present, as `null` when cleared.
    #[must_use]
    pub fn to_public_metadata(&self) -> Value {
        json!({
            HAS_ORGANIZATION_KEY: self.has_organization,
            ORGANIZATION_ID_KEY: self.organization_id,
        })
    }
}
