use ciborium::value::Value as CborValue;

use super::attested_credential_data::AttestedCredentialData;
use super::errors::CredentialDataError;
use crate::utils::base64url_decode;

const RP_ID_HASH_LEN: usize = 32;
const FLAGS_OFFSET: usize = RP_ID_HASH_LEN;
const COUNTER_OFFSET: usize = FLAGS_OFFSET + 1;
const MIN_AUTH_DATA_LEN: usize = COUNTER_OFFSET + 4;

/// Flags for AuthenticatorData as defined in WebAuthn spec Level 2
mod auth_data_flags {
    /// User Present (UP) - Bit 0
    pub(super) const UP: u8 = 1 << 0;
    /// User Verified (UV) - Bit 2
    pub(super) const UV: u8 = 1 << 2;
    /// Backup Eligibility (BE) - Bit 3
    pub(super) const BE: u8 = 1 << 3;
    /// Backup State (BS) - Bit 4
    pub(super) const BS: u8 = 1 << 4;
    /// Attested Credential Data Present - Bit 6
    pub(super) const AT: u8 = 1 << 6;
    /// Extension Data Present - Bit 7
    pub(super) const ED: u8 = 1 << 7;
}

/// AuthenticatorData structure as defined in WebAuthn spec Level 2
/// https://www.w3.org/TR/webauthn-2/#sctn-authenticator-data
///
/// The attested credential data is located with the codec's consumed count,
/// which is what tells us where the extension map starts.
#[derive(Debug, Clone)]
pub struct AuthenticatorData {
    /// SHA-256 hash of the RP ID (32 bytes)
    pub rp_id_hash: Vec<u8>,

    /// Flags (1 byte), see the `is_*` / `has_*` accessors
    pub flags: u8,

    /// Signature counter, 32-bit unsigned big-endian integer
    pub counter: u32,

    /// Present when the AT flag is set
    pub attested_credential_data: Option<AttestedCredentialData>,

    /// Authenticator extension outputs, present when the ED flag is set
    pub extensions: Option<CborValue>,
}

impl AuthenticatorData {
    /// Parse base64url-encoded authenticator data
    pub fn from_base64(auth_data: &str) -> Result<Self, CredentialDataError> {
        let data = base64url_decode(auth_data)?;
        Self::from_bytes(&data)
    }

    /// Parse raw authenticator data
    /// Format (minimum 37 bytes):
    /// - RP ID Hash (32 bytes)
    /// - Flags (1 byte)
    /// - Counter (4 bytes)
    /// - Optional: Attested Credential Data
    /// - Optional: Extensions
    pub fn from_bytes(data: &[u8]) -> Result<Self, CredentialDataError> {
        if data.len() < MIN_AUTH_DATA_LEN {
            return Err(CredentialDataError::Truncated {
                field: "authenticator_data",
                expected: MIN_AUTH_DATA_LEN,
                actual: data.len(),
            });
        }

        let flags = data[FLAGS_OFFSET];
        let counter = u32::from_be_bytes([
            data[COUNTER_OFFSET],
            data[COUNTER_OFFSET + 1],
            data[COUNTER_OFFSET + 2],
            data[COUNTER_OFFSET + 3],
        ]);

        let mut rest = &data[MIN_AUTH_DATA_LEN..];

        let attested_credential_data = if flags & auth_data_flags::AT != 0 {
            Some(AttestedCredentialData::read_from(&mut rest)?)
        } else {
            None
        };

        let extensions = if flags & auth_data_flags::ED != 0 {
            let value: CborValue = ciborium::de::from_reader(&mut rest).map_err(|e| {
                CredentialDataError::AuthenticatorData(format!(
                    "Invalid extension data CBOR: {e}"
                ))
            })?;
            if !matches!(value, CborValue::Map(_)) {
                return Err(CredentialDataError::AuthenticatorData(
                    "Extension data is not a CBOR map".to_string(),
                ));
            }
            Some(value)
        } else {
            None
        };

        if !rest.is_empty() {
            return Err(CredentialDataError::AuthenticatorData(format!(
                "{} unexpected trailing bytes (flags: {:02x})",
                rest.len(),
                flags
            )));
        }

        let auth_data = Self {
            rp_id_hash: data[..RP_ID_HASH_LEN].to_vec(),
            flags,
            counter,
            attested_credential_data,
            extensions,
        };

        tracing::debug!("User present: {}", auth_data.is_user_present());
        tracing::debug!("User verified: {}", auth_data.is_user_verified());
        tracing::debug!("Backup eligible: {}", auth_data.is_backup_eligible());
        tracing::debug!("Backed up: {}", auth_data.is_backed_up());
        tracing::debug!(
            "Attested credential data: {}",
            auth_data.has_attested_credential_data()
        );
        tracing::debug!("Extension data: {}", auth_data.has_extension_data());

        Ok(auth_data)
    }

    /// Check if user was present during the ceremony
    pub fn is_user_present(&self) -> bool {
        (self.flags & auth_data_flags::UP) != 0
    }

    /// Check if user was verified by the authenticator
    pub fn is_user_verified(&self) -> bool {
        (self.flags & auth_data_flags::UV) != 0
    }

    /// Check if the credential may be backed up (multi-device credential)
    pub fn is_backup_eligible(&self) -> bool {
        (self.flags & auth_data_flags::BE) != 0
    }

    /// Check if this credential is backed up
    pub fn is_backed_up(&self) -> bool {
        (self.flags & auth_data_flags::BS) != 0
    }

    pub fn has_attested_credential_data(&self) -> bool {
        (self.flags & auth_data_flags::AT) != 0
    }

    pub fn has_extension_data(&self) -> bool {
        (self.flags & auth_data_flags::ED) != 0
    }
}
