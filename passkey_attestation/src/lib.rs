//! passkey-attestation - WebAuthn attestation checks for relying parties
//!
//! This crate decodes and validates the credential material an authenticator
//! returns during passkey registration:
//!
//! - [`credential`]: the attested credential data codec (AAGUID, credential ID,
//!   COSE public key) and the authenticator data that frames it
//! - [`android_key`]: the Android key attestation certificate extension
//! - [`origin`]: client origin checks against the configured origins
//!
//! Ceremony orchestration, storage and transport are left to the caller.

mod config;
#[cfg(test)]
mod test_utils;
mod utils;

pub mod android_key;
pub mod credential;
pub mod origin;

pub use android_key::{
    AndroidKeyError, CertificateExtensions, KeyDescriptionValidator, verify_attestation_certificate,
    verify_key_description,
};
pub use credential::{
    Aaguid, AttestedCredentialData, AuthenticatorData, CoseKey, CredentialDataError,
    extract_credential_id,
};
pub use origin::{Origin, OriginError, OriginMatcher, OriginMatching, OriginValidator, ServerOrigins};
pub use utils::{UtilError, client_data_hash};
