use serde::Serialize;

use super::errors::OriginError;
use super::types::{Origin, OriginMatching};
use crate::config::{ADDITIONAL_ORIGINS, ORIGIN, ORIGIN_MATCHING};

/// Relation deciding whether an asserted origin is acceptable for one
/// configured origin.
///
/// Implemented by [`OriginMatching`] and by any `Fn(&Origin, &Origin) -> bool`,
/// called as `(asserted, configured)`.
pub trait OriginMatcher {
    fn matches(&self, asserted: &Origin, configured: &Origin) -> bool;
}

impl OriginMatcher for OriginMatching {
    fn matches(&self, asserted: &Origin, configured: &Origin) -> bool {
        match self {
            OriginMatching::Strict => asserted == configured,
            OriginMatching::Relaxed => asserted.matches_relaxed(configured),
        }
    }
}

impl<F> OriginMatcher for F
where
    F: Fn(&Origin, &Origin) -> bool,
{
    fn matches(&self, asserted: &Origin, configured: &Origin) -> bool {
        self(asserted, configured)
    }
}

/// Ordered set of origins the relying party accepts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerOrigins {
    origins: Vec<Origin>,
}

#[derive(Serialize)]
struct WebAuthnConfig<'a> {
    /// The WebAuthn relying party ID
    rp_id: &'a str,

    /// List of origins that are allowed to use this WebAuthn configuration
    origins: &'a [Origin],
}

impl ServerOrigins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an origin, returning false if it was already present
    pub fn insert(&mut self, origin: Origin) -> bool {
        if self.origins.contains(&origin) {
            return false;
        }
        self.origins.push(origin);
        true
    }

    pub fn contains(&self, origin: &Origin) -> bool {
        self.origins.contains(origin)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Origin> {
        self.origins.iter()
    }

    pub fn len(&self) -> usize {
        self.origins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    /// `ORIGIN` followed by the comma separated `WEBAUTHN_ADDITIONAL_ORIGINS`
    pub fn from_env() -> Result<Self, OriginError> {
        Self::from_settings(ORIGIN.as_deref(), &ADDITIONAL_ORIGINS)
    }

    pub(crate) fn from_settings(
        primary: Option<&str>,
        additional: &[String],
    ) -> Result<Self, OriginError> {
        let primary = primary.ok_or_else(|| {
            OriginError::Config("ORIGIN must be set to the relying party origin".to_string())
        })?;

        let mut origins = Self::new();
        for value in std::iter::once(primary).chain(additional.iter().map(String::as_str)) {
            let origin = value
                .parse::<Origin>()
                .map_err(|e| OriginError::Config(format!("Invalid configured origin: {e}")))?;
            if !origins.insert(origin) {
                tracing::debug!("Ignoring duplicate configured origin: {}", value);
            }
        }
        Ok(origins)
    }

    /// WebAuthn configuration JSON listing the relying party ID and all
    /// allowed origins, for serving related origin requests.
    pub fn related_origins_json(&self, rp_id: &str) -> Result<String, OriginError> {
        let config = WebAuthnConfig {
            rp_id,
            origins: &self.origins,
        };
        serde_json::to_string_pretty(&config).map_err(|e| OriginError::Serde(e.to_string()))
    }
}

impl FromIterator<Origin> for ServerOrigins {
    fn from_iter<I: IntoIterator<Item = Origin>>(iter: I) -> Self {
        let mut origins = Self::new();
        for origin in iter {
            origins.insert(origin);
        }
        origins
    }
}

impl<'a> IntoIterator for &'a ServerOrigins {
    type Item = &'a Origin;
    type IntoIter = std::slice::Iter<'a, Origin>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Checks a client-asserted origin against the configured origins
#[derive(Debug, Clone, Copy)]
pub struct OriginValidator<M = OriginMatching> {
    matcher: M,
}

impl OriginValidator<OriginMatching> {
    /// Exact scheme, host and port equality
    pub fn strict() -> Self {
        Self::with_matcher(OriginMatching::Strict)
    }

    /// Same scheme, host equal to or a subdomain of a configured host
    pub fn relaxed() -> Self {
        Self::with_matcher(OriginMatching::Relaxed)
    }

    /// Mode from `WEBAUTHN_ORIGIN_MATCHING`, strict unless set to `relaxed`
    pub fn from_env() -> Self {
        Self::with_matcher(*ORIGIN_MATCHING)
    }
}

impl<M: OriginMatcher> OriginValidator<M> {
    pub fn with_matcher(matcher: M) -> Self {
        Self { matcher }
    }

    /// Succeeds if `asserted` matches at least one configured origin. A missing
    /// asserted origin never matches.
    pub fn validate(
        &self,
        asserted: Option<&Origin>,
        server_origins: &ServerOrigins,
    ) -> Result<(), OriginError> {
        let matched = asserted.is_some_and(|asserted| {
            server_origins
                .iter()
                .any(|configured| self.matcher.matches(asserted, configured))
        });

        if matched {
            return Ok(());
        }

        tracing::debug!(
            "Origin {:?} does not match any of {:?}",
            asserted,
            server_origins.origins
        );
        Err(OriginError::BadOrigin {
            asserted: asserted.cloned(),
            configured: server_origins.origins.clone(),
        })
    }
}
