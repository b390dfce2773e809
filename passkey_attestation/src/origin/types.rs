use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use url::Url;

use super::errors::OriginError;

/// A web origin: scheme, host and port.
///
/// The port is normalized with the scheme's default, so `https://example.com`
/// and `https://example.com:443` are the same origin.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Origin {
    scheme: String,
    host: String,
    port: Option<u16>,
    default_port: bool,
}

impl Origin {
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Same scheme, and this host equals or is a subdomain of `configured`'s
    /// host. Ports are not compared.
    pub fn matches_relaxed(&self, configured: &Origin) -> bool {
        if self.scheme != configured.scheme {
            return false;
        }
        self.host == configured.host
            || self
                .host
                .strip_suffix(configured.host.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    }
}

impl FromStr for Origin {
    type Err = OriginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(s.trim())
            .map_err(|e| OriginError::Invalid(format!("{s}: {e}")))?;

        let host = url
            .host_str()
            .ok_or_else(|| OriginError::Invalid(format!("{s}: missing host")))?;
        if !url.username().is_empty() || url.password().is_some() {
            return Err(OriginError::Invalid(format!("{s}: credentials not allowed")));
        }
        if !matches!(url.path(), "" | "/") || url.query().is_some() || url.fragment().is_some() {
            return Err(OriginError::Invalid(format!(
                "{s}: path, query and fragment not allowed"
            )));
        }

        Ok(Self {
            scheme: url.scheme().to_string(),
            host: host.to_string(),
            port: url.port_or_known_default(),
            default_port: url.port().is_none(),
        })
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)?;
        match self.port {
            Some(port) if !self.default_port => write!(f, ":{port}"),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Origin({self})")
    }
}

impl Serialize for Origin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Origin {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Built-in origin comparison modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OriginMatching {
    /// Scheme, host and port must all be equal
    #[default]
    Strict,
    /// [`Origin::matches_relaxed`]
    Relaxed,
}
