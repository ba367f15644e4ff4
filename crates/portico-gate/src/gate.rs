//! The access decision.

use portico_auth::IdentityProvider;
use portico_config::GateConfig;
use portico_core::Session;

use crate::policy::{RouteClass, RoutingPolicy};

const ROOT_PATH: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    /// Sign-in page; the HTTP layer appends the original URL as `redirect_url`.
    SignIn,
    Dashboard,
    Onboarding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(RedirectTarget),
}

/// Decides what happens to a request given its path and session.
#[derive(Debug, Clone)]
pub struct Gate {
    policy: RoutingPolicy,
    sign_in_path: String,
    dashboard_path: String,
    onboarding_path: String,
}

impl Gate {
    #[must_use]
    pub fn new(
        policy: RoutingPolicy,
        sign_in_path: impl Into<String>,
        dashboard_path: impl Into<String>,
        onboarding_path: impl Into<String>,
    ) -> Self {
        Self {
            policy,
            sign_in_path: sign_in_path.into(),
            dashboard_path: dashboard_path.into(),
            onboarding_path: onboarding_path.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(
            RoutingPolicy::from_config(config),
            config.sign_in_path.as_str(),
            config.dashboard_path.as_str(),
            config.onboarding_path.as_str(),
        )
    }

    #[must_use]
    pub const fn policy(&self) -> &RoutingPolicy {
        &self.policy
    }

    #[must_use]
    pub fn target_path(&self, target: RedirectTarget) -> &str {
        match target {
            RedirectTarget::SignIn => &self.sign_in_path,
            RedirectTarget::Dashboard => &self.dashboard_path,
            RedirectTarget::Onboarding => &self.onboarding_path,
        }
    }

    /// Decide a request's fate. Rules, first match wins:
    ///
    /// 1. exempt path: allow
    /// 2. `/` with a user: dashboard if they have an organization, else onboarding
    /// 3. no user on a non-public path: sign-in
    /// 4. user without organization on a non-public path other than
    ///    onboarding: onboarding
    /// 5. allow
    ///
    /// Organization membership comes from the session's active organization,
    /// falling back to the profile flag in the user's public metadata. The
    /// flag is only fetched when a rule depends on it. A failed fetch is
    /// logged and counts as "no organization".
    pub async fn evaluate(
        &self,
        path: &str,
        session: &Session,
        provider: &dyn IdentityProvider,
    ) -> Decision {
        let class = self.policy.classify(path);
        if class == RouteClass::Exempt {
            return Decision::Allow;
        }

        let Some(user_id) = session.user_id.as_deref() else {
            return if class == RouteClass::Public {
                Decision::Allow
            } else {
                Decision::Redirect(RedirectTarget::SignIn)
            };
        };

        if path == ROOT_PATH {
            return if has_organization(user_id, session, provider).await {
                Decision::Redirect(RedirectTarget::Dashboard)
            } else {
                Decision::Redirect(RedirectTarget::Onboarding)
            };
        }

        if class == RouteClass::Public || path == self.onboarding_path {
            return Decision::Allow;
        }

        if has_organization(user_id, session, provider).await {
            Decision::Allow
        } else {
            Decision::Redirect(RedirectTarget::Onboarding)
        }
    }
}

async fn has_organization(
    user_id: &str,
    session: &Session,
    provider: &dyn IdentityProvider,
) -> bool {
    if session.has_active_org() {
        return true;
    }

    match provider.profile_flag(user_id).await {
        Ok(flag) => flag.has_organization,
        Err(error) => {
            tracing::error!(
                %user_id,
                %error,
                "failed to read organization flag; treating as no organization"
            );
            false
        }
    }
}
