use std::ops::Range;

use super::aaguid::{AAGUID_LEN, Aaguid};
use super::cose_key::CoseKey;
use super::errors::CredentialDataError;
use crate::utils::base64url_encode;

const CREDENTIAL_ID_LENGTH_LEN: usize = 2;
const CREDENTIAL_ID_OFFSET: usize = AAGUID_LEN + CREDENTIAL_ID_LENGTH_LEN;

/// Maximum credential ID length representable by the 16-bit length prefix
pub const MAX_CREDENTIAL_ID_LEN: usize = u16::MAX as usize;

/// Attested credential data as laid out inside authenticator data:
///
/// ```text
/// offset 0      16 bytes   AAGUID
/// offset 16     2 bytes    credential ID length L, big-endian
/// offset 18     L bytes    credential ID
/// offset 18+L   CBOR map   credential public key (COSE_Key)
/// ```
///
/// Anything after the public key belongs to the enclosing structure
/// (authenticator extension outputs) and is left for the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestedCredentialData {
    aaguid: Aaguid,
    credential_id: Vec<u8>,
    credential_public_key: CoseKey,
}

impl AttestedCredentialData {
    pub fn new(aaguid: Aaguid, credential_id: Vec<u8>, credential_public_key: CoseKey) -> Self {
        Self {
            aaguid,
            credential_id,
            credential_public_key,
        }
    }

    pub fn builder() -> AttestedCredentialDataBuilder {
        AttestedCredentialDataBuilder::default()
    }

    pub fn aaguid(&self) -> &Aaguid {
        &self.aaguid
    }

    pub fn credential_id(&self) -> &[u8] {
        &self.credential_id
    }

    /// Credential ID in the base64url form used by WebAuthn JSON messages
    pub fn credential_id_base64url(&self) -> String {
        base64url_encode(&self.credential_id)
    }

    pub fn credential_public_key(&self) -> &CoseKey {
        &self.credential_public_key
    }

    /// Encode to the binary layout. The public key is written as CBOR with no
    /// length prefix.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CredentialDataError> {
        let id_len = u16::try_from(self.credential_id.len())
            .map_err(|_| CredentialDataError::CredentialIdTooLong(self.credential_id.len()))?;
        let key_bytes = self.credential_public_key.to_bytes()?;

        let mut bytes =
            Vec::with_capacity(CREDENTIAL_ID_OFFSET + self.credential_id.len() + key_bytes.len());
        bytes.extend_from_slice(self.aaguid.as_bytes());
        bytes.extend_from_slice(&id_len.to_be_bytes());
        bytes.extend_from_slice(&self.credential_id);
        bytes.extend_from_slice(&key_bytes);
        Ok(bytes)
    }

    /// Decode from the start of `bytes`.
    ///
    /// Returns the decoded data and the number of bytes it occupied, so
    /// `&bytes[consumed..]` is exactly the trailing data that followed the
    /// public key.
    pub fn from_slice(bytes: &[u8]) -> Result<(Self, usize), CredentialDataError> {
        let id_range = credential_id_range(bytes)?;

        let mut aaguid = [0u8; AAGUID_LEN];
        aaguid.copy_from_slice(&bytes[..AAGUID_LEN]);
        let credential_id = bytes[id_range.clone()].to_vec();

        let (credential_public_key, key_len) = CoseKey::from_prefix(&bytes[id_range.end..])?;
        let consumed = id_range.end + key_len;

        tracing::debug!(
            "Decoded attested credential data: aaguid={}, credential_id_len={}, consumed={} of {} bytes",
            Aaguid::new(aaguid),
            credential_id.len(),
            consumed,
            bytes.len()
        );

        Ok((
            Self {
                aaguid: Aaguid::new(aaguid),
                credential_id,
                credential_public_key,
            },
            consumed,
        ))
    }

    /// Decode from a cursor, advancing it past the attested credential data
    /// only. On error the cursor is left untouched.
    pub fn read_from(cursor: &mut &[u8]) -> Result<Self, CredentialDataError> {
        let bytes = *cursor;
        let (data, consumed) = Self::from_slice(bytes)?;
        *cursor = &bytes[consumed..];
        Ok(data)
    }
}

/// Return the credential ID without decoding the public key.
///
/// Reads the same length field, with the same bounds checks, as
/// [`AttestedCredentialData::from_slice`].
pub fn extract_credential_id(bytes: &[u8]) -> Result<&[u8], CredentialDataError> {
    let id_range = credential_id_range(bytes)?;
    Ok(&bytes[id_range])
}

/// Validate the fixed-width prefix and locate the credential ID
fn credential_id_range(bytes: &[u8]) -> Result<Range<usize>, CredentialDataError> {
    if bytes.len() < AAGUID_LEN {
        return Err(CredentialDataError::Truncated {
            field: "aaguid",
            expected: AAGUID_LEN,
            actual: bytes.len(),
        });
    }
    if bytes.len() < CREDENTIAL_ID_OFFSET {
        return Err(CredentialDataError::Truncated {
            field: "credential_id_length",
            expected: CREDENTIAL_ID_OFFSET,
            actual: bytes.len(),
        });
    }

    let id_len = u16::from_be_bytes([bytes[AAGUID_LEN], bytes[AAGUID_LEN + 1]]) as usize;
    let id_end = CREDENTIAL_ID_OFFSET + id_len;
    if bytes.len() < id_end {
        return Err(CredentialDataError::Truncated {
            field: "credential_id",
            expected: id_end,
            actual: bytes.len(),
        });
    }

    Ok(CREDENTIAL_ID_OFFSET..id_end)
}

/// Builder for [`AttestedCredentialData`]; every field is required
#[derive(Debug, Default)]
pub struct AttestedCredentialDataBuilder {
    aaguid: Option<Aaguid>,
    credential_id: Option<Vec<u8>>,
    credential_public_key: Option<CoseKey>,
}

impl AttestedCredentialDataBuilder {
    pub fn aaguid(mut self, aaguid: Aaguid) -> Self {
        self.aaguid = Some(aaguid);
        self
    }

    pub fn credential_id(mut self, credential_id: impl Into<Vec<u8>>) -> Self {
        self.credential_id = Some(credential_id.into());
        self
    }

    pub fn credential_public_key(mut self, key: CoseKey) -> Self {
        self.credential_public_key = Some(key);
        self
    }

    pub fn build(self) -> Result<AttestedCredentialData, CredentialDataError> {
        Ok(AttestedCredentialData {
            aaguid: self
                .aaguid
                .ok_or(CredentialDataError::MissingField("aaguid"))?,
            credential_id: self
                .credential_id
                .ok_or(CredentialDataError::MissingField("credential_id"))?,
            credential_public_key: self
                .credential_public_key
                .ok_or(CredentialDataError::MissingField("credential_public_key"))?,
        })
    }
}
