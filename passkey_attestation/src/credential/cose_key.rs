use ciborium::value::{Integer, Value as CborValue};

use super::errors::CredentialDataError;

// COSE key common parameters (RFC 9052 section 7.1)
const LABEL_KTY: i64 = 1;
const LABEL_KID: i64 = 2;
const LABEL_ALG: i64 = 3;

// Key type specific parameters (RFC 9053 sections 7.1, 7.2 and RFC 8230)
const LABEL_CRV: i64 = -1;
const LABEL_X: i64 = -2;
const LABEL_Y: i64 = -3;
const LABEL_RSA_N: i64 = -1;
const LABEL_RSA_E: i64 = -2;

const KTY_OKP: i64 = 1;
const KTY_EC2: i64 = 2;
const KTY_RSA: i64 = 3;

/// COSE algorithm identifiers accepted for WebAuthn credential keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoseAlgorithm {
    ES256,
    ES384,
    ES512,
    EdDSA,
    PS256,
    PS384,
    PS512,
    RS256,
    RS384,
    RS512,
    RS1,
}

impl CoseAlgorithm {
    pub fn value(self) -> i64 {
        match self {
            CoseAlgorithm::ES256 => -7,
            CoseAlgorithm::ES384 => -35,
            CoseAlgorithm::ES512 => -36,
            CoseAlgorithm::EdDSA => -8,
            CoseAlgorithm::PS256 => -37,
            CoseAlgorithm::PS384 => -38,
            CoseAlgorithm::PS512 => -39,
            CoseAlgorithm::RS256 => -257,
            CoseAlgorithm::RS384 => -258,
            CoseAlgorithm::RS512 => -259,
            CoseAlgorithm::RS1 => -65535,
        }
    }
}

impl TryFrom<i64> for CoseAlgorithm {
    type Error = CredentialDataError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -7 => Ok(CoseAlgorithm::ES256),
            -35 => Ok(CoseAlgorithm::ES384),
            -36 => Ok(CoseAlgorithm::ES512),
            -8 => Ok(CoseAlgorithm::EdDSA),
            -37 => Ok(CoseAlgorithm::PS256),
            -38 => Ok(CoseAlgorithm::PS384),
            -39 => Ok(CoseAlgorithm::PS512),
            -257 => Ok(CoseAlgorithm::RS256),
            -258 => Ok(CoseAlgorithm::RS384),
            -259 => Ok(CoseAlgorithm::RS512),
            -65535 => Ok(CoseAlgorithm::RS1),
            _ => Err(CredentialDataError::MalformedKey(format!(
                "Unsupported COSE algorithm: {value}"
            ))),
        }
    }
}

/// COSE elliptic curve identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoseCurve {
    P256,
    P384,
    P521,
    X25519,
    X448,
    Ed25519,
    Ed448,
}

impl CoseCurve {
    pub fn value(self) -> i64 {
        match self {
            CoseCurve::P256 => 1,
            CoseCurve::P384 => 2,
            CoseCurve::P521 => 3,
            CoseCurve::X25519 => 4,
            CoseCurve::X448 => 5,
            CoseCurve::Ed25519 => 6,
            CoseCurve::Ed448 => 7,
        }
    }

    /// Length in bytes of a single public coordinate on this curve
    pub fn coordinate_len(self) -> usize {
        match self {
            CoseCurve::P256 => 32,
            CoseCurve::P384 => 48,
            CoseCurve::P521 => 66,
            CoseCurve::X25519 => 32,
            CoseCurve::X448 => 56,
            CoseCurve::Ed25519 => 32,
            CoseCurve::Ed448 => 57,
        }
    }

    fn is_ec2(self) -> bool {
        matches!(self, CoseCurve::P256 | CoseCurve::P384 | CoseCurve::P521)
    }
}

impl TryFrom<i64> for CoseCurve {
    type Error = CredentialDataError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(CoseCurve::P256),
            2 => Ok(CoseCurve::P384),
            3 => Ok(CoseCurve::P521),
            4 => Ok(CoseCurve::X25519),
            5 => Ok(CoseCurve::X448),
            6 => Ok(CoseCurve::Ed25519),
            7 => Ok(CoseCurve::Ed448),
            _ => Err(CredentialDataError::MalformedKey(format!(
                "Unsupported COSE curve: {value}"
            ))),
        }
    }
}

/// Key type specific public parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoseKeyParams {
    /// Elliptic curve key with x and y coordinates
    Ec2 {
        curve: CoseCurve,
        x: Vec<u8>,
        y: Vec<u8>,
    },
    /// Octet key pair, e.g. Ed25519
    Okp { curve: CoseCurve, x: Vec<u8> },
    /// RSA public key
    Rsa { n: Vec<u8>, e: Vec<u8> },
}

impl CoseKeyParams {
    /// Check curve and key type pairing, coordinate lengths and RSA parameters
    fn validate(&self) -> Result<(), CredentialDataError> {
        match self {
            CoseKeyParams::Ec2 { curve, x, y } => {
                if !curve.is_ec2() {
                    return Err(CredentialDataError::MalformedKey(format!(
                        "Curve {curve:?} is not valid for an EC2 key"
                    )));
                }
                check_coordinate_len(*curve, "x", x)?;
                check_coordinate_len(*curve, "y", y)
            }
            CoseKeyParams::Okp { curve, x } => {
                if curve.is_ec2() {
                    return Err(CredentialDataError::MalformedKey(format!(
                        "Curve {curve:?} is not valid for an OKP key"
                    )));
                }
                check_coordinate_len(*curve, "x", x)
            }
            CoseKeyParams::Rsa { n, e } => {
                if n.is_empty() || e.is_empty() {
                    return Err(CredentialDataError::MalformedKey(
                        "RSA modulus and exponent must not be empty".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Credential public key in COSE_Key format, as carried in attested credential data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoseKey {
    pub key_id: Option<Vec<u8>>,
    pub algorithm: Option<CoseAlgorithm>,
    pub params: CoseKeyParams,
}

impl CoseKey {
    /// EC2 key without a key ID
    pub fn ec2(algorithm: CoseAlgorithm, curve: CoseCurve, x: Vec<u8>, y: Vec<u8>) -> Self {
        Self {
            key_id: None,
            algorithm: Some(algorithm),
            params: CoseKeyParams::Ec2 { curve, x, y },
        }
    }

    /// OKP key without a key ID
    pub fn okp(algorithm: CoseAlgorithm, curve: CoseCurve, x: Vec<u8>) -> Self {
        Self {
            key_id: None,
            algorithm: Some(algorithm),
            params: CoseKeyParams::Okp { curve, x },
        }
    }

    /// RSA key without a key ID
    pub fn rsa(algorithm: CoseAlgorithm, n: Vec<u8>, e: Vec<u8>) -> Self {
        Self {
            key_id: None,
            algorithm: Some(algorithm),
            params: CoseKeyParams::Rsa { n, e },
        }
    }

    pub fn key_type(&self) -> i64 {
        match self.params {
            CoseKeyParams::Okp { .. } => KTY_OKP,
            CoseKeyParams::Ec2 { .. } => KTY_EC2,
            CoseKeyParams::Rsa { .. } => KTY_RSA,
        }
    }

    /// Encode the key as a single CBOR map.
    ///
    /// Keys that [`from_prefix`](Self::from_prefix) would reject are refused
    /// here with `MalformedKey`.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CredentialDataError> {
        self.params.validate()?;
        let mut bytes = Vec::new();
        ciborium::ser::into_writer(&self.to_cbor_value(), &mut bytes).map_err(|e| {
            CredentialDataError::MalformedKey(format!("Failed to encode COSE key: {e}"))
        })?;
        Ok(bytes)
    }

    /// Decode one CBOR value from the start of `bytes`.
    ///
    /// Returns the key and the number of bytes the CBOR value occupied; any
    /// bytes after that are left for the caller.
    pub fn from_prefix(bytes: &[u8]) -> Result<(Self, usize), CredentialDataError> {
        let mut cursor = bytes;
        let value: CborValue = ciborium::de::from_reader(&mut cursor).map_err(|e| {
            CredentialDataError::MalformedKey(format!("Failed to decode COSE key CBOR: {e}"))
        })?;
        let consumed = bytes.len() - cursor.len();

        let key = Self::from_cbor_value(&value)?;
        tracing::debug!(
            "Decoded COSE key (kty={}, alg={:?}) from {} bytes",
            key.key_type(),
            key.algorithm,
            consumed
        );
        Ok((key, consumed))
    }

    pub(crate) fn to_cbor_value(&self) -> CborValue {
        let mut entries = vec![(label(LABEL_KTY), int(self.key_type()))];
        if let Some(kid) = &self.key_id {
            entries.push((label(LABEL_KID), CborValue::Bytes(kid.clone())));
        }
        if let Some(alg) = self.algorithm {
            entries.push((label(LABEL_ALG), int(alg.value())));
        }

        match &self.params {
            CoseKeyParams::Ec2 { curve, x, y } => {
                entries.push((label(LABEL_CRV), int(curve.value())));
                entries.push((label(LABEL_X), CborValue::Bytes(x.clone())));
                entries.push((label(LABEL_Y), CborValue::Bytes(y.clone())));
            }
            CoseKeyParams::Okp { curve, x } => {
                entries.push((label(LABEL_CRV), int(curve.value())));
                entries.push((label(LABEL_X), CborValue::Bytes(x.clone())));
            }
            CoseKeyParams::Rsa { n, e } => {
                entries.push((label(LABEL_RSA_N), CborValue::Bytes(n.clone())));
                entries.push((label(LABEL_RSA_E), CborValue::Bytes(e.clone())));
            }
        }

        CborValue::Map(entries)
    }

    pub(crate) fn from_cbor_value(value: &CborValue) -> Result<Self, CredentialDataError> {
        let CborValue::Map(entries) = value else {
            return Err(CredentialDataError::MalformedKey(
                "COSE key is not a CBOR map".to_string(),
            ));
        };

        // Only integer labels are defined for public key parameters
        let mut params: Vec<(i64, &CborValue)> = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let Some(label) = key.as_integer().and_then(|i| i64::try_from(i).ok()) else {
                continue;
            };
            if params.iter().any(|(l, _)| *l == label) {
                return Err(CredentialDataError::MalformedKey(format!(
                    "Duplicate COSE key parameter: {label}"
                )));
            }
            params.push((label, value));
        }
        let params = Params(params);

        let kty = params.required_int(LABEL_KTY, "kty")?;
        let key_id = params.optional_bytes(LABEL_KID, "kid")?;
        let algorithm = params
            .optional_int(LABEL_ALG, "alg")?
            .map(CoseAlgorithm::try_from)
            .transpose()?;

        let key_params = match kty {
            KTY_EC2 => CoseKeyParams::Ec2 {
                curve: CoseCurve::try_from(params.required_int(LABEL_CRV, "crv")?)?,
                x: params.required_bytes(LABEL_X, "x")?,
                y: params.required_bytes(LABEL_Y, "y")?,
            },
            KTY_OKP => CoseKeyParams::Okp {
                curve: CoseCurve::try_from(params.required_int(LABEL_CRV, "crv")?)?,
                x: params.required_bytes(LABEL_X, "x")?,
            },
            KTY_RSA => CoseKeyParams::Rsa {
                n: params.required_bytes(LABEL_RSA_N, "n")?,
                e: params.required_bytes(LABEL_RSA_E, "e")?,
            },
            other => {
                return Err(CredentialDataError::MalformedKey(format!(
                    "Unsupported COSE key type: {other}"
                )));
            }
        };

        key_params.validate()?;

        Ok(Self {
            key_id,
            algorithm,
            params: key_params,
        })
    }
}

struct Params<'a>(Vec<(i64, &'a CborValue)>);

impl<'a> Params<'a> {
    fn get(&self, label: i64) -> Option<&'a CborValue> {
        self.0.iter().find(|(l, _)| *l == label).map(|(_, v)| *v)
    }

    fn optional_int(&self, label: i64, name: &str) -> Result<Option<i64>, CredentialDataError> {
        match self.get(label) {
            None => Ok(None),
            Some(CborValue::Integer(i)) => i64::try_from(*i).map(Some).map_err(|_| {
                CredentialDataError::MalformedKey(format!("COSE key {name} is out of range"))
            }),
            Some(_) => Err(CredentialDataError::MalformedKey(format!(
                "COSE key {name} must be an integer"
            ))),
        }
    }

    fn required_int(&self, label: i64, name: &str) -> Result<i64, CredentialDataError> {
        self.optional_int(label, name)?.ok_or_else(|| {
            CredentialDataError::MalformedKey(format!("Missing COSE key parameter: {name}"))
        })
    }

    fn optional_bytes(
        &self,
        label: i64,
        name: &str,
    ) -> Result<Option<Vec<u8>>, CredentialDataError> {
        match self.get(label) {
            None => Ok(None),
            Some(CborValue::Bytes(b)) => Ok(Some(b.clone())),
            Some(_) => Err(CredentialDataError::MalformedKey(format!(
                "COSE key {name} must be a byte string"
            ))),
        }
    }

    fn required_bytes(&self, label: i64, name: &str) -> Result<Vec<u8>, CredentialDataError> {
        self.optional_bytes(label, name)?.ok_or_else(|| {
            CredentialDataError::MalformedKey(format!("Missing COSE key parameter: {name}"))
        })
    }
}

fn check_coordinate_len(
    curve: CoseCurve,
    name: &str,
    coordinate: &[u8],
) -> Result<(), CredentialDataError> {
    if coordinate.len() != curve.coordinate_len() {
        return Err(CredentialDataError::MalformedKey(format!(
            "{name} coordinate for {curve:?} must be {} bytes, got {}",
            curve.coordinate_len(),
            coordinate.len()
        )));
    }
    Ok(())
}

fn label(l: i64) -> CborValue {
    CborValue::Integer(Integer::from(l))
}

fn int(v: i64) -> CborValue {
    CborValue::Integer(Integer::from(v))
}
