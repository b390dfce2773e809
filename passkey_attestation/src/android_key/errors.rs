use thiserror::Error;

/// Errors that can occur during Android key attestation checks.
///
/// `Certificate` and `Extension` mean the input could not be read at all; the
/// remaining variants are named policy failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AndroidKeyError {
    /// The attestation certificate is not valid DER X.509
    #[error("Invalid attestation certificate: {0}")]
    Certificate(String),

    /// The key attestation extension is absent or structurally invalid
    #[error("Invalid key attestation extension: {0}")]
    Extension(String),

    #[error("Bad attestation challenge")]
    BadAttestationChallenge,

    /// allApplications is present, so the key is not bound to one relying party
    #[error("Key is not scoped properly")]
    KeyNotScoped,

    #[error("Key is not generated in secure hardware")]
    KeyNotGeneratedInSecureHardware,

    #[error("Key purpose is invalid")]
    InvalidKeyPurpose,
}
