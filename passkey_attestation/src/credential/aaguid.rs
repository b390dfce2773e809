use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

pub const AAGUID_LEN: usize = 16;

/// Authenticator Attestation GUID, the 16 byte authenticator model identifier.
///
/// The all-zero value is what authenticators report when they do not disclose
/// their model (e.g. with "none" attestation); it is a valid value, not an error.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Aaguid([u8; AAGUID_LEN]);

impl Aaguid {
    pub const ZERO: Aaguid = Aaguid([0u8; AAGUID_LEN]);

    pub const fn new(bytes: [u8; AAGUID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; AAGUID_LEN] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; AAGUID_LEN]
    }

    pub fn to_uuid(&self) -> Uuid {
        Uuid::from_bytes(self.0)
    }
}

impl From<[u8; AAGUID_LEN]> for Aaguid {
    fn from(bytes: [u8; AAGUID_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<Uuid> for Aaguid {
    fn from(uuid: Uuid) -> Self {
        Self(uuid.into_bytes())
    }
}

impl TryFrom<&[u8]> for Aaguid {
    type Error = std::array::TryFromSliceError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Ok(Self(bytes.try_into()?))
    }
}

impl FromStr for Aaguid {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self::from)
    }
}

impl fmt::Display for Aaguid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uuid().hyphenated())
    }
}

impl fmt::Debug for Aaguid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Aaguid({self})")
    }
}

impl Serialize for Aaguid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Aaguid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
