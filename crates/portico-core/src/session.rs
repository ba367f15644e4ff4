/// Per-request identity resolved from the Clerk session token.
///
/// Produced by `portico-auth`, consumed by the gate. Contains only data
/// fields, no token handling. An empty session means the caller is anonymous.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Clerk user ID (from JWT `sub` claim).
    pub user_id: Option<String>,
    /// Active organization ID (from JWT `org.id` claim). This is the
    /// organization the caller has selected, not the full membership list.
    pub org_id: Option<String>,
}

impl Session {
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            user_id: None,
            org_id: None,
        }
    }

    #[must_use]
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            org_id: None,
        }
    }

    /// Set the active organization on a signed-in session.
    #[must_use]
    pub fn with_org(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    #[must_use]
    pub const fn has_active_org(&self) -> bool {
        self.org_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_has_no_identity() {
        let session = Session::anonymous();
        assert!(!session.is_authenticated());
        assert!(!session.has_active_org());
        assert_eq!(session, Session::default());
    }

    #[test]
    fn signed_in_without_org() {
        let session = Session::signed_in("user_123");
        assert!(session.is_authenticated());
        assert!(!session.has_active_org());
        assert_eq!(session.user_id.as_deref(), Some("user_123"));
    }

    #[test]
    fn with_org_sets_active_org() {
        let session = Session::signed_in("user_123").with_org("org_abc");
        assert!(session.has_active_org());
        assert_eq!(session.org_id.as_deref(), Some("org_abc"));
    }
}
