mod certificate;
mod errors;
mod key_description;
mod validator;

pub use certificate::{ANDROID_KEY_ATTESTATION_OID, CertificateExtensions};
pub use errors::AndroidKeyError;
pub use key_description::{
    AuthorizationList, KM_ORIGIN_GENERATED, KM_PURPOSE_SIGN, KM_TAG_ALL_APPLICATIONS,
    KM_TAG_ORIGIN, KM_TAG_PURPOSE, KeyDescription, SecurityLevel,
};
pub use validator::{KeyDescriptionValidator, verify_attestation_certificate, verify_key_description};
