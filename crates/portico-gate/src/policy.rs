//! Path classification.
//!
//! A [`RoutingPolicy`] is an ordered table of prefix rules. The first rule
//! whose prefix the path starts with decides the class; paths matching no
//! rule are protected. Matching is prefix-based, so `/sign-in/factor-one`
//! inherits the class of `/sign-in`.
//!
//! Static assets are exempt before any rule is consulted, except under the
//! always-gated prefixes (`/api`, `/trpc` by default), where a `.png` or `.css`
//! suffix does not open the route.

use std::fmt;

use portico_config::GateConfig;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteClass {
    /// Bypasses the gate entirely (framework internals, static files, webhooks).
    Exempt,
    /// Reachable without signing in.
    Public,
    /// Requires a signed-in user with an organization.
    Protected,
}

impl fmt::Display for RouteClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Exempt => "exempt",
            Self::Public => "public",
            Self::Protected => "protected",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRule {
    pub prefix: String,
    pub class: RouteClass,
}

impl RouteRule {
    #[must_use]
    pub fn new(prefix: impl Into<String>, class: RouteClass) -> Self {
        Self {
            prefix: prefix.into(),
            class,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RoutingPolicy {
    rules: Vec<RouteRule>,
    static_extensions: Vec<String>,
    always_gated: Vec<String>,
}

impl RoutingPolicy {
    #[must_use]
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self {
            rules,
            static_extensions: Vec::new(),
            always_gated: Vec::new(),
        }
    }

    /// Treat paths whose last segment ends in one of `extensions` as exempt.
    #[must_use]
    pub fn with_static_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.static_extensions = extensions
            .into_iter()
            .map(|ext| ext.into().to_ascii_lowercase())
            .collect();
        self
    }

    /// Never apply the static-asset bypass under these prefixes.
    #[must_use]
    pub fn with_always_gated<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.always_gated = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Build the policy from config: exempt prefixes first, then public ones.
    #[must_use]
    pub fn from_config(config: &GateConfig) -> Self {
        let exempt = config
            .exempt_prefixes
            .iter()
            .map(|p| RouteRule::new(p.as_str(), RouteClass::Exempt));
        let public = config
            .public_prefixes
            .iter()
            .map(|p| RouteRule::new(p.as_str(), RouteClass::Public));
        Self::new(exempt.chain(public).collect())
            .with_static_extensions(config.static_extensions.iter().cloned())
            .with_always_gated(config.always_gated_prefixes.iter().cloned())
    }

    #[must_use]
    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    #[must_use]
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.is_static_asset(path) {
            return RouteClass::Exempt;
        }
        self.rules
            .iter()
            .find(|rule| path.starts_with(rule.prefix.as_str()))
            .map_or(RouteClass::Protected, |rule| rule.class)
    }

    /// Whether the path bypasses the gate as a static file.
    #[must_use]
    pub fn is_static_asset(&self, path: &str) -> bool {
        if self
            .always_gated
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
        {
            return false;
        }
        let segment = path.rsplit('/').next().unwrap_or(path);
        segment.rsplit_once('.').is_some_and(|(stem, ext)| {
            !stem.is_empty()
                && self
                    .static_extensions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
        })
    }
}
