//! Access gate configuration: redirect targets and path tables.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GateConfig {
    /// Where anonymous callers are sent. Receives a `redirect_url` query.
    pub sign_in_path: String,

    /// Where `/` sends signed-in users that belong to an organization.
    pub dashboard_path: String,

    /// Where signed-in users without an organization are sent.
    pub onboarding_path: String,

    /// Prefixes that bypass the gate entirely.
    pub exempt_prefixes: Vec<String>,

    /// Prefixes reachable without signing in.
    pub public_prefixes: Vec<String>,

    /// File extensions treated as static assets and never gated.
    pub static_extensions: Vec<String>,

    /// Prefixes where the static-asset bypass does not apply, so
    /// `/api/avatars/a.png` is still gated. Exempt prefixes still win.
    pub always_gated_prefixes: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            sign_in_path: "/sign-in".into(),
            dashboard_path: "/dashboard".into(),
            onboarding_path: "/demo-request".into(),
            exempt_prefixes: strings(&["/_next", "/favicon.ico", "/api/webhooks"]),
            public_prefixes: strings(&["/sign-in", "/sign-up", "/demo-request"]),
            static_extensions: strings(&[
                "ico", "jpg", "jpeg", "png", "gif", "svg", "js", "css", "ttf", "otf", "woff",
                "woff2", "map",
            ]),
            always_gated_prefixes: strings(&["/api", "/trpc"]),
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}
