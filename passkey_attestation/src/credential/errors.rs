use thiserror::Error;

use crate::utils::UtilError;

/// Errors that can occur while encoding or decoding attested credential data.
///
/// All of these are structural: the input cannot be interpreted and the
/// ceremony that produced it should be rejected.
#[derive(Debug, Error)]
pub enum CredentialDataError {
    /// A required field was never supplied to the builder
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// The buffer ends before a fixed or length-prefixed field is complete
    #[error("Truncated input: {field} needs {expected} bytes, only {actual} available")]
    Truncated {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The credential public key is not a well-formed COSE key
    #[error("Malformed credential public key: {0}")]
    MalformedKey(String),

    /// The credential ID does not fit the 16-bit length prefix
    #[error("Credential ID too long: {0} bytes, maximum is 65535")]
    CredentialIdTooLong(usize),

    /// Error parsing the authenticator data that frames the credential
    #[error("Invalid authenticator data: {0}")]
    AuthenticatorData(String),

    /// Error from utility operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}
