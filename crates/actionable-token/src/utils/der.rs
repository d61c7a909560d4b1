//! DER encoding of RSA public keys published as JWK `n`/`e` pairs
//!
//! aws-lc-rs verifies against a SubjectPublicKeyInfo, so the JWK components are
//! wrapped as `SEQUENCE { rsaEncryption, BIT STRING { RSAPublicKey } }`.

use crate::error::{Error, Result};
use der::asn1::{AnyRef, BitString, UintRef};
use der::{Encode, Sequence};
use spki::{AlgorithmIdentifierOwned, ObjectIdentifier, SubjectPublicKeyInfoOwned};

const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// Moduli above 65536 bits are refused outright
const MAX_RSA_MODULUS_BYTES: usize = 8192;

/// RSAPublicKey (RFC 8017 §A.1.1)
#[derive(Sequence)]
struct RsaPublicKey<'a> {
    modulus: UintRef<'a>,
    public_exponent: UintRef<'a>,
}

fn encoding_error(what: &str, details: impl std::fmt::Display) -> Error {
    Error::RemoteError(format!("jwk: {what}: {details}"))
}

/// Build a DER SubjectPublicKeyInfo from big-endian modulus and exponent bytes
pub(crate) fn rsa_spki_from_n_e(n: &[u8], e: &[u8]) -> Result<Vec<u8>> {
    if n.is_empty() || e.is_empty() {
        return Err(encoding_error("rsa key", "empty modulus or exponent"));
    }
    if n.len() > MAX_RSA_MODULUS_BYTES {
        return Err(encoding_error(
            "RSA modulus too large",
            format!("{} bytes (maximum: {MAX_RSA_MODULUS_BYTES} bytes)", n.len()),
        ));
    }

    let rsa_key = RsaPublicKey {
        modulus: UintRef::new(n).map_err(|e| encoding_error("modulus", e))?,
        public_exponent: UintRef::new(e).map_err(|e| encoding_error("exponent", e))?,
    }
    .to_der()
    .map_err(|e| encoding_error("RSAPublicKey", e))?;

    let spki = SubjectPublicKeyInfoOwned {
        algorithm: AlgorithmIdentifierOwned {
            oid: RSA_ENCRYPTION,
            parameters: Some(AnyRef::NULL.into()),
        },
        subject_public_key: BitString::from_bytes(&rsa_key)
            .map_err(|e| encoding_error("bit string", e))?,
    };

    spki.to_der().map_err(|e| encoding_error("SPKI", e))
}
