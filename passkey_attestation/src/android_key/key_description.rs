//! Named view over the Android `KeyDescription` extension.
//!
//! ```text
//! KeyDescription ::= SEQUENCE {
//!     attestationVersion         INTEGER,
//!     attestationSecurityLevel   SecurityLevel,
//!     keymasterVersion           INTEGER,
//!     keymasterSecurityLevel     SecurityLevel,
//!     attestationChallenge       OCTET STRING,
//!     uniqueId                   OCTET STRING,
//!     softwareEnforced           AuthorizationList,
//!     teeEnforced                AuthorizationList,
//!     ...
//! }
//! ```
//!
//! See https://source.android.com/docs/security/features/keystore/attestation#schema

use der_parser::ber::{BerObject, BerObjectContent};
use der_parser::der::{Tag, parse_der};
use num_bigint::BigInt;
use thiserror::Error;

use super::errors::AndroidKeyError;

const ATTESTATION_VERSION_INDEX: usize = 0;
const ATTESTATION_SECURITY_LEVEL_INDEX: usize = 1;
const KEYMASTER_VERSION_INDEX: usize = 2;
const KEYMASTER_SECURITY_LEVEL_INDEX: usize = 3;
const ATTESTATION_CHALLENGE_INDEX: usize = 4;
const UNIQUE_ID_INDEX: usize = 5;
const SOFTWARE_ENFORCED_INDEX: usize = 6;
const TEE_ENFORCED_INDEX: usize = 7;
const KEY_DESCRIPTION_MIN_LEN: usize = TEE_ENFORCED_INDEX + 1;

pub const KM_TAG_PURPOSE: u32 = 1;
pub const KM_TAG_ALL_APPLICATIONS: u32 = 600;
pub const KM_TAG_ORIGIN: u32 = 702;
pub const KM_ORIGIN_GENERATED: u32 = 0;
pub const KM_PURPOSE_SIGN: u32 = 2;

/// Where the attestation or the keymaster runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityLevel {
    Software,
    TrustedEnvironment,
    StrongBox,
    Unknown(u64),
}

impl From<u64> for SecurityLevel {
    fn from(value: u64) -> Self {
        match value {
            0 => SecurityLevel::Software,
            1 => SecurityLevel::TrustedEnvironment,
            2 => SecurityLevel::StrongBox,
            other => SecurityLevel::Unknown(other),
        }
    }
}

/// Why a single authorization entry could not be read.
///
/// Only ever turns a check into `false`; it is never returned to callers.
#[derive(Debug, Error)]
pub(super) enum EntryError {
    #[error("tag {0} not present")]
    Absent(u32),

    #[error("tag {tag}: {reason}")]
    Malformed { tag: u32, reason: String },

    #[error("expected INTEGER, found {0}")]
    NotAnInteger(String),
}

#[derive(Debug, Clone)]
pub struct KeyDescription<'a> {
    pub attestation_version: Option<BigInt>,
    pub attestation_security_level: Option<SecurityLevel>,
    pub keymaster_version: Option<BigInt>,
    pub keymaster_security_level: Option<SecurityLevel>,
    pub attestation_challenge: &'a [u8],
    pub unique_id: Option<&'a [u8]>,
    pub software_enforced: AuthorizationList<'a>,
    pub tee_enforced: AuthorizationList<'a>,
}

impl<'a> KeyDescription<'a> {
    /// Parse the DER `KeyDescription` carried in the extension value.
    ///
    /// Fails when the value is not a SEQUENCE of at least eight elements, when
    /// the challenge is not an OCTET STRING or when either authorization list is
    /// not a SEQUENCE. The version and security level fields are informational
    /// and read leniently.
    pub fn parse(extension: &'a [u8]) -> Result<Self, AndroidKeyError> {
        let (rem, parsed) = parse_der(extension)
            .map_err(|e| AndroidKeyError::Extension(format!("Failed to parse DER: {e}")))?;
        if !rem.is_empty() {
            return Err(AndroidKeyError::Extension(format!(
                "{} trailing bytes after KeyDescription",
                rem.len()
            )));
        }

        let BerObjectContent::Sequence(items) = parsed.content else {
            return Err(AndroidKeyError::Extension(
                "KeyDescription is not a SEQUENCE".to_string(),
            ));
        };
        if items.len() < KEY_DESCRIPTION_MIN_LEN {
            return Err(AndroidKeyError::Extension(format!(
                "KeyDescription has {} elements, expected at least {}",
                items.len(),
                KEY_DESCRIPTION_MIN_LEN
            )));
        }

        let attestation_challenge = match items[ATTESTATION_CHALLENGE_INDEX].content {
            BerObjectContent::OctetString(challenge) => challenge,
            _ => {
                return Err(AndroidKeyError::Extension(
                    "attestationChallenge is not an OCTET STRING".to_string(),
                ));
            }
        };
        let unique_id = match items[UNIQUE_ID_INDEX].content {
            BerObjectContent::OctetString(id) => Some(id),
            _ => None,
        };

        Ok(Self {
            attestation_version: integer_value(&items[ATTESTATION_VERSION_INDEX]).ok(),
            attestation_security_level: security_level(&items[ATTESTATION_SECURITY_LEVEL_INDEX]),
            keymaster_version: integer_value(&items[KEYMASTER_VERSION_INDEX]).ok(),
            keymaster_security_level: security_level(&items[KEYMASTER_SECURITY_LEVEL_INDEX]),
            attestation_challenge,
            unique_id,
            software_enforced: AuthorizationList::from_object(
                &items[SOFTWARE_ENFORCED_INDEX],
                "softwareEnforced",
            )?,
            tee_enforced: AuthorizationList::from_object(&items[TEE_ENFORCED_INDEX], "teeEnforced")?,
        })
    }
}

/// One authorization list: a SEQUENCE of `[tag] EXPLICIT value` entries
#[derive(Debug, Clone)]
pub struct AuthorizationList<'a> {
    entries: Vec<BerObject<'a>>,
}

impl<'a> AuthorizationList<'a> {
    fn from_object(object: &BerObject<'a>, name: &str) -> Result<Self, AndroidKeyError> {
        match &object.content {
            BerObjectContent::Sequence(entries) => Ok(Self {
                entries: entries.clone(),
            }),
            _ => Err(AndroidKeyError::Extension(format!(
                "{name} is not a SEQUENCE"
            ))),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if any non-universal entry carries the tag number, whatever its
    /// class or value
    pub fn contains_tag(&self, tag: u32) -> bool {
        self.entries
            .iter()
            .any(|entry| !entry.header.is_universal() && entry.header.tag() == Tag(tag))
    }

    /// First entry with the tag, unwrapped to its single child
    pub(super) fn entry(&self, tag: u32) -> Result<BerObject<'_>, EntryError> {
        let tagged = self
            .entries
            .iter()
            .find(|entry| is_tagged(entry, tag))
            .ok_or(EntryError::Absent(tag))?;

        if !tagged.header.is_constructed() {
            return Err(EntryError::Malformed {
                tag,
                reason: "explicit tag is not constructed".to_string(),
            });
        }
        let BerObjectContent::Unknown(any) = &tagged.content else {
            return Err(EntryError::Malformed {
                tag,
                reason: "unexpected content".to_string(),
            });
        };

        let (rem, child) = parse_der(any.as_bytes()).map_err(|e| EntryError::Malformed {
            tag,
            reason: e.to_string(),
        })?;
        if !rem.is_empty() {
            return Err(EntryError::Malformed {
                tag,
                reason: "more than one child".to_string(),
            });
        }
        Ok(child)
    }

    /// origin == KM_ORIGIN_GENERATED
    pub fn is_key_generated(&self) -> bool {
        match self
            .entry(KM_TAG_ORIGIN)
            .and_then(|origin| integer_value(&origin))
        {
            Ok(origin) => origin == BigInt::from(KM_ORIGIN_GENERATED),
            Err(e) => {
                tracing::debug!("Failed to retrieve origin: {}", e);
                false
            }
        }
    }

    /// purpose contains KM_PURPOSE_SIGN. A malformed element ends the scan.
    pub fn has_sign_purpose(&self) -> bool {
        let purposes = match self.entry(KM_TAG_PURPOSE) {
            Ok(purposes) => purposes,
            Err(e) => {
                tracing::debug!("Failed to retrieve purpose: {}", e);
                return false;
            }
        };
        let BerObjectContent::Set(items) = &purposes.content else {
            tracing::debug!("Failed to retrieve purpose: not a SET");
            return false;
        };

        let sign = BigInt::from(KM_PURPOSE_SIGN);
        for item in items {
            match integer_value(item) {
                Ok(purpose) if purpose == sign => return true,
                Ok(_) => continue,
                Err(e) => {
                    tracing::debug!("Failed to retrieve purpose: {}", e);
                    return false;
                }
            }
        }
        false
    }
}

fn is_tagged(entry: &BerObject<'_>, tag: u32) -> bool {
    entry.header.is_contextspecific() && entry.header.tag() == Tag(tag)
}

/// Decode an INTEGER of any size from its two's-complement content
pub(super) fn integer_value(object: &BerObject<'_>) -> Result<BigInt, EntryError> {
    match object.content {
        BerObjectContent::Integer(bytes) if !bytes.is_empty() => {
            Ok(BigInt::from_signed_bytes_be(bytes))
        }
        ref other => Err(EntryError::NotAnInteger(format!("{other:?}"))),
    }
}

fn security_level(object: &BerObject<'_>) -> Option<SecurityLevel> {
    match object.content {
        BerObjectContent::Enum(value) => Some(SecurityLevel::from(value)),
        _ => None,
    }
}
