use x509_parser::certificate::X509Certificate;

/// DER content bytes of OID 1.3.6.1.4.1.11129.2.1.17 (Android key attestation)
pub const ANDROID_KEY_ATTESTATION_OID: &[u8] =
    &[0x2B, 0x06, 0x01, 0x04, 0x01, 0xD6, 0x79, 0x02, 0x01, 0x11];

/// Read access to X.509 extensions by OID.
///
/// `oid` is the DER content encoding of the object identifier, and the returned
/// bytes are the extension's `extnValue` with the OCTET STRING wrapper removed.
/// When an extension appears more than once the first occurrence wins.
pub trait CertificateExtensions {
    fn extension_value(&self, oid: &[u8]) -> Option<&[u8]>;
}

impl CertificateExtensions for X509Certificate<'_> {
    fn extension_value(&self, oid: &[u8]) -> Option<&[u8]> {
        self.extensions()
            .iter()
            .find(|ext| ext.oid.as_bytes() == oid)
            .map(|ext| ext.value)
    }
}
