mod aaguid;
mod attested_credential_data;
mod authenticator_data;
mod cose_key;
mod errors;

pub use aaguid::{AAGUID_LEN, Aaguid};
pub use attested_credential_data::{
    AttestedCredentialData, AttestedCredentialDataBuilder, MAX_CREDENTIAL_ID_LEN,
    extract_credential_id,
};
pub use authenticator_data::AuthenticatorData;
pub use cose_key::{CoseAlgorithm, CoseCurve, CoseKey, CoseKeyParams};
pub use errors::CredentialDataError;
