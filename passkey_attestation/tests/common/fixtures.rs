use passkey_attestation::android_key::{
    ANDROID_KEY_ATTESTATION_OID, KM_TAG_ALL_APPLICATIONS, KM_TAG_ORIGIN, KM_TAG_PURPOSE,
};
use passkey_attestation::credential::{CoseAlgorithm, CoseCurve, CoseKey};

use super::der;

// 1.2.840.10045.4.3.2 ecdsa-with-SHA256
const OID_ECDSA_WITH_SHA256: &[u8] = &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x04, 0x03, 0x02];
// 1.2.840.10045.2.1 id-ecPublicKey
const OID_EC_PUBLIC_KEY: &[u8] = &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01];
// 1.2.840.10045.3.1.7 prime256v1
const OID_PRIME256V1: &[u8] = &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x03, 0x01, 0x07];
// 2.5.4.3 commonName
const OID_COMMON_NAME: &[u8] = &[0x55, 0x04, 0x03];
/// 1.2.3.4, an extension nobody interprets
pub const OID_UNRELATED: &[u8] = &[0x2a, 0x03, 0x04];

pub const RP_ORIGIN: &str = "https://example.com";

/// Contents of one authorization list
#[derive(Debug, Clone, Default)]
pub struct AuthorizationListSpec {
    pub purposes: Option<Vec<u64>>,
    pub all_applications: bool,
    pub origin: Option<u64>,
}

impl AuthorizationListSpec {
    /// origin GENERATED, purpose SIGN
    pub fn generated_signing_key() -> Self {
        Self {
            purposes: Some(vec![2]),
            all_applications: false,
            origin: Some(0),
        }
    }

    /// Entries in ascending tag order, as keymaster emits them
    pub fn to_der(&self) -> Vec<u8> {
        let mut entries = Vec::new();
        if let Some(purposes) = &self.purposes {
            let items: Vec<Vec<u8>> = purposes.iter().map(|p| der::integer(*p)).collect();
            entries.push(der::explicit(KM_TAG_PURPOSE, &der::set(&items)));
        }
        if self.all_applications {
            entries.push(der::explicit(KM_TAG_ALL_APPLICATIONS, &der::null()));
        }
        if let Some(origin) = self.origin {
            entries.push(der::explicit(KM_TAG_ORIGIN, &der::integer(origin)));
        }
        der::sequence(&entries)
    }
}

pub fn key_description(
    challenge: &[u8],
    software_enforced: &AuthorizationListSpec,
    tee_enforced: &AuthorizationListSpec,
) -> Vec<u8> {
    der::sequence(&[
        der::integer(3),
        der::enumerated(1),
        der::integer(4),
        der::enumerated(1),
        der::octet_string(challenge),
        der::octet_string(b""),
        software_enforced.to_der(),
        tee_enforced.to_der(),
    ])
}

fn name(common_name: &str) -> Vec<u8> {
    der::sequence(&[der::set(&[der::sequence(&[
        der::oid(OID_COMMON_NAME),
        der::utf8_string(common_name),
    ])])])
}

/// Self-contained v3 certificate with the given extensions.
///
/// The signature is filler: only the structure matters for extension checks.
pub fn certificate_der(extensions: &[(&[u8], Vec<u8>)]) -> Vec<u8> {
    let signature_algorithm = der::sequence(&[der::oid(OID_ECDSA_WITH_SHA256)]);

    let mut public_key = vec![0x04];
    public_key.extend_from_slice(&[0x11; 32]);
    public_key.extend_from_slice(&[0x22; 32]);
    let subject_public_key_info = der::sequence(&[
        der::sequence(&[der::oid(OID_EC_PUBLIC_KEY), der::oid(OID_PRIME256V1)]),
        der::bit_string(&public_key),
    ]);

    let extensions: Vec<Vec<u8>> = extensions
        .iter()
        .map(|(oid, value)| der::sequence(&[der::oid(oid), der::octet_string(value)]))
        .collect();

    let tbs_certificate = der::sequence(&[
        der::explicit(0, &der::integer(2)),
        der::integer(1),
        signature_algorithm.clone(),
        name("Android Keystore Software Attestation Intermediate"),
        der::sequence(&[
            der::utc_time("250101000000Z"),
            der::utc_time("350101000000Z"),
        ]),
        name("Android Keystore Key"),
        subject_public_key_info,
        der::explicit(3, &der::sequence(&extensions)),
    ]);

    der::sequence(&[
        tbs_certificate,
        signature_algorithm,
        der::bit_string(&[0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01]),
    ])
}

pub fn android_key_certificate(key_description: Vec<u8>) -> Vec<u8> {
    certificate_der(&[
        (OID_UNRELATED, der::null()),
        (ANDROID_KEY_ATTESTATION_OID, key_description),
    ])
}

pub fn es256_key() -> CoseKey {
    CoseKey::ec2(
        CoseAlgorithm::ES256,
        CoseCurve::P256,
        vec![0x11; 32],
        vec![0x22; 32],
    )
}

/// rpIdHash, flags and counter followed by `body`
pub fn authenticator_data(flags: u8, counter: u32, body: &[u8]) -> Vec<u8> {
    let mut data = vec![0x5a; 32];
    data.push(flags);
    data.extend_from_slice(&counter.to_be_bytes());
    data.extend_from_slice(body);
    data
}
