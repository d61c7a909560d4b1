//! JWK (JSON Web Key) struct and conversion

use crate::algorithm::AlgorithmType;
use crate::error::{Error, Result};
use crate::keys::SigningKey;
use crate::limits::{MAX_JWK_ALG_SIZE, MAX_JWK_E_SIZE, MAX_JWK_KID_SIZE, MAX_JWK_N_SIZE};
use crate::utils::base64url;
use crate::utils::der::rsa_spki_from_n_e;
use miniserde::Deserialize;

/// JSON Web Key as published in the token service's key set
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Jwk {
    /// Key type; only "RSA" is usable
    pub kty: Option<String>,
    pub kid: Option<String>,
    /// Advisory algorithm (RFC 7517 §4.4); enforced when present
    pub alg: Option<String>,
    /// Intended use (RFC 7517 §4.2); "sig" or absent
    #[serde(rename = "use")]
    pub key_use: Option<String>,
    /// SHA-1 thumbprint of the signing certificate
    pub x5t: Option<String>,
    /// RSA modulus (Base64URL)
    pub n: Option<String>,
    /// RSA exponent (Base64URL)
    pub e: Option<String>,
}

impl Jwk {
    /// Convert to a [`SigningKey`] after checking type, use and field sizes
    pub(crate) fn to_signing_key(&self) -> Result<SigningKey> {
        self.validate_structure()?;

        let key_der = self.to_rsa_der()?;
        let mut key = SigningKey::from_der(self.kid.clone(), key_der)
            .with_advertised_algorithm(self.alg.clone());
        if let Some(x5t) = &self.x5t {
            key = key.with_thumbprint(x5t.clone());
        }
        Ok(key)
    }

    fn validate_structure(&self) -> Result<()> {
        match self.kty.as_deref() {
            Some("RSA") => {}
            Some(kty) => {
                return Err(Error::RemoteError(format!(
                    "jwks: key type mismatch: expected RSA, found {kty}"
                )));
            }
            None => return Err(Error::RemoteError("jwks: missing key type (kty)".into())),
        }

        if let Some(use_val) = &self.key_use {
            if use_val != "sig" {
                return Err(Error::RemoteError(format!(
                    "jwks: key use mismatch: expected 'sig', found '{use_val}'"
                )));
            }
        }

        for (field, value, max) in [
            ("alg", &self.alg, MAX_JWK_ALG_SIZE),
            ("kid", &self.kid, MAX_JWK_KID_SIZE),
            ("x5t", &self.x5t, MAX_JWK_KID_SIZE),
        ] {
            if let Some(value) = value {
                if value.len() > max {
                    return Err(Error::JwkFieldTooLarge {
                        field: field.into(),
                        size: value.len(),
                        max,
                    });
                }
            }
        }

        // An advertised algorithm outside the RSA family makes the key unusable
        if let Some(alg) = &self.alg {
            AlgorithmType::from_str(alg)?;
        }

        Ok(())
    }

    fn to_rsa_der(&self) -> Result<Vec<u8>> {
        // Base64URL: 4 chars → 3 bytes
        const MAX_DECODED_JWK_N: usize = (MAX_JWK_N_SIZE * 3) / 4;
        const MAX_DECODED_JWK_E: usize = (MAX_JWK_E_SIZE * 3) / 4;

        let n = self
            .n
            .as_deref()
            .ok_or_else(|| Error::RemoteError("jwks: rsa key missing n (modulus)".into()))?;
        let e = self
            .e
            .as_deref()
            .ok_or_else(|| Error::RemoteError("jwks: rsa key missing e (exponent)".into()))?;

        if n.len() > MAX_JWK_N_SIZE {
            return Err(Error::JwkFieldTooLarge {
                field: "n".into(),
                size: n.len(),
                max: MAX_JWK_N_SIZE,
            });
        }
        if e.len() > MAX_JWK_E_SIZE {
            return Err(Error::JwkFieldTooLarge {
                field: "e".into(),
                size: e.len(),
                max: MAX_JWK_E_SIZE,
            });
        }

        let n_bytes = base64url::decode_bytes("n", n, MAX_DECODED_JWK_N)?;
        let e_bytes = base64url::decode_bytes("e", e, MAX_DECODED_JWK_E)?;

        rsa_spki_from_n_e(&n_bytes, &e_bytes)
    }
}
