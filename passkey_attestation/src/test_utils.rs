//! Shared helpers for unit tests across the crate

// Generic DER writer, shared with the integration tests
#[allow(dead_code)]
#[path = "../tests/common/der.rs"]
mod der_writer;

/// DER builders for Android KeyDescription fixtures
pub(crate) mod der {
    pub(crate) use super::der_writer::*;
    use crate::android_key::{KM_TAG_ALL_APPLICATIONS, KM_TAG_ORIGIN, KM_TAG_PURPOSE};

    pub(crate) fn purposes(values: &[u64]) -> Vec<u8> {
        let items: Vec<Vec<u8>> = values.iter().map(|v| integer(*v)).collect();
        explicit(KM_TAG_PURPOSE, &set(&items))
    }

    pub(crate) fn all_applications() -> Vec<u8> {
        explicit(KM_TAG_ALL_APPLICATIONS, &null())
    }

    pub(crate) fn origin(value: u64) -> Vec<u8> {
        explicit(KM_TAG_ORIGIN, &integer(value))
    }

    /// KeyDescription version 3 from a TEE keymaster
    pub(crate) fn key_description(
        challenge: &[u8],
        software_enforced: &[u8],
        tee_enforced: &[u8],
    ) -> Vec<u8> {
        sequence(&[
            integer(3),
            enumerated(1),
            integer(4),
            enumerated(1),
            octet_string(challenge),
            octet_string(b""),
            software_enforced.to_vec(),
            tee_enforced.to_vec(),
        ])
    }

    #[test]
    fn test_high_tag_number_encoding() {
        assert_eq!(&explicit(600, &[])[..3], &[0xbf, 0x84, 0x58]);
        assert_eq!(&explicit(702, &[])[..3], &[0xbf, 0x85, 0x3e]);
        assert_eq!(explicit(1, &[]), vec![0xa1, 0x00]);
    }

    #[test]
    fn test_integer_encoding() {
        assert_eq!(integer(0), vec![0x02, 0x01, 0x00]);
        assert_eq!(integer(2), vec![0x02, 0x01, 0x02]);
        assert_eq!(integer(0x80), vec![0x02, 0x02, 0x00, 0x80]);
    }
}

/// Certificate stand-in holding extensions as (oid, value) pairs
#[derive(Debug, Default)]
pub(crate) struct FakeCertificate {
    pub(crate) extensions: Vec<(Vec<u8>, Vec<u8>)>,
}

impl FakeCertificate {
    pub(crate) fn with_key_description(key_description: Vec<u8>) -> Self {
        Self {
            extensions: vec![(
                crate::android_key::ANDROID_KEY_ATTESTATION_OID.to_vec(),
                key_description,
            )],
        }
    }
}

impl crate::android_key::CertificateExtensions for FakeCertificate {
    fn extension_value(&self, oid: &[u8]) -> Option<&[u8]> {
        self.extensions
            .iter()
            .find(|(ext_oid, _)| ext_oid == oid)
            .map(|(_, value)| value.as_slice())
    }
}
