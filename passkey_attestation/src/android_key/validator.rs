use subtle::ConstantTimeEq;
use x509_parser::{certificate::X509Certificate, prelude::*};

use super::certificate::{ANDROID_KEY_ATTESTATION_OID, CertificateExtensions};
use super::errors::AndroidKeyError;
use super::key_description::{KM_TAG_ALL_APPLICATIONS, KeyDescription};
use crate::config::ANDROID_KEY_TEE_ENFORCED_ONLY;
use crate::utils::client_data_hash;

/// Verify the Android key attestation extension of a credential certificate.
///
/// 1. The attestationChallenge equals `expected_challenge`.
/// 2. allApplications is absent from both authorization lists.
/// 3. origin is KM_ORIGIN_GENERATED and purpose contains KM_PURPOSE_SIGN, in the
///    teeEnforced list when `tee_enforced_only`, otherwise in either list.
///
/// An absent or unreadable extension is an `Extension` error. Entries that are
/// missing or malformed only make the corresponding check fail.
pub fn verify_key_description<C>(
    certificate: &C,
    expected_challenge: &[u8],
    tee_enforced_only: bool,
) -> Result<(), AndroidKeyError>
where
    C: CertificateExtensions + ?Sized,
{
    let extension = certificate
        .extension_value(ANDROID_KEY_ATTESTATION_OID)
        .ok_or_else(|| {
            AndroidKeyError::Extension("Android key attestation extension not found".to_string())
        })?;
    let key_description = KeyDescription::parse(extension)?;

    tracing::debug!(
        "KeyDescription: attestation version {:?} ({:?}), keymaster version {:?} ({:?})",
        key_description.attestation_version,
        key_description.attestation_security_level,
        key_description.keymaster_version,
        key_description.keymaster_security_level
    );

    if !bool::from(
        key_description
            .attestation_challenge
            .ct_eq(expected_challenge),
    ) {
        return Err(AndroidKeyError::BadAttestationChallenge);
    }

    let software_enforced = &key_description.software_enforced;
    let tee_enforced = &key_description.tee_enforced;

    if software_enforced.contains_tag(KM_TAG_ALL_APPLICATIONS)
        || tee_enforced.contains_tag(KM_TAG_ALL_APPLICATIONS)
    {
        return Err(AndroidKeyError::KeyNotScoped);
    }

    let key_generated = if tee_enforced_only {
        tee_enforced.is_key_generated()
    } else {
        tee_enforced.is_key_generated() || software_enforced.is_key_generated()
    };
    if !key_generated {
        return Err(AndroidKeyError::KeyNotGeneratedInSecureHardware);
    }

    let sign_purpose = if tee_enforced_only {
        tee_enforced.has_sign_purpose()
    } else {
        tee_enforced.has_sign_purpose() || software_enforced.has_sign_purpose()
    };
    if !sign_purpose {
        return Err(AndroidKeyError::InvalidKeyPurpose);
    }

    tracing::debug!(
        "Android key attestation extension verified (tee_enforced_only: {})",
        tee_enforced_only
    );
    Ok(())
}

/// Parse a DER certificate and verify its Android key attestation extension
pub fn verify_attestation_certificate(
    certificate_der: &[u8],
    expected_challenge: &[u8],
    tee_enforced_only: bool,
) -> Result<(), AndroidKeyError> {
    let (_, certificate) = X509Certificate::from_der(certificate_der).map_err(|e| {
        AndroidKeyError::Certificate(format!("Failed to parse certificate: {e}"))
    })?;

    verify_key_description(&certificate, expected_challenge, tee_enforced_only)
}

/// Android key attestation checks with a fixed authorization list policy.
///
/// `Default` reads `ANDROID_KEY_TEE_ENFORCED_ONLY` (false when unset).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDescriptionValidator {
    tee_enforced_only: bool,
}

impl Default for KeyDescriptionValidator {
    fn default() -> Self {
        Self::new(*ANDROID_KEY_TEE_ENFORCED_ONLY)
    }
}

impl KeyDescriptionValidator {
    pub fn new(tee_enforced_only: bool) -> Self {
        Self { tee_enforced_only }
    }

    pub fn tee_enforced_only(&self) -> bool {
        self.tee_enforced_only
    }

    /// `client_data_hash` is the SHA-256 of clientDataJSON
    pub fn validate<C>(&self, certificate: &C, client_data_hash: &[u8]) -> Result<(), AndroidKeyError>
    where
        C: CertificateExtensions + ?Sized,
    {
        verify_key_description(certificate, client_data_hash, self.tee_enforced_only)
    }

    /// Same as [`validate`](Self::validate), hashing the raw clientDataJSON first
    pub fn validate_client_data<C>(
        &self,
        certificate: &C,
        client_data_json: &[u8],
    ) -> Result<(), AndroidKeyError>
    where
        C: CertificateExtensions + ?Sized,
    {
        self.validate(certificate, &client_data_hash(client_data_json))
    }
}
