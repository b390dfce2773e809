use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use ring::digest;
use thiserror::Error;

pub(crate) fn base64url_decode(input: &str) -> Result<Vec<u8>, UtilError> {
    let decoded = URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|_| UtilError::Format("Failed to decode base64url".to_string()))?;
    Ok(decoded)
}

pub(crate) fn base64url_encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// SHA-256 of the raw clientDataJSON bytes.
///
/// Android key attestation embeds this hash as the attestation challenge of the
/// credential key certificate.
pub fn client_data_hash(client_data_json: &[u8]) -> Vec<u8> {
    digest::digest(&digest::SHA256, client_data_json)
        .as_ref()
        .to_vec()
}

#[derive(Debug, Error, Clone)]
pub enum UtilError {
    #[error("Invalid format: {0}")]
    Format(String),
}
