//! Signing keys and key selection

use crate::algorithm::AlgorithmType;
use crate::error::{Error, Result};
use crate::header::TokenHeader;
use crate::jwks::jwk::Jwk;
use std::fmt;
use std::sync::Arc;

/// Public key trusted to sign tokens
///
/// Holds the DER-encoded RSA public key plus the identifiers a token header can use to
/// select it. Cloning is cheap; the key bytes are shared.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey {
    kid: Option<String>,
    thumbprint: Option<String>,
    algorithm: Option<String>,
    key_der: Arc<[u8]>,
}

impl SigningKey {
    /// Create a key from a DER SubjectPublicKeyInfo (or PKCS#1 RSAPublicKey)
    pub fn from_der(kid: Option<String>, key_der: impl Into<Arc<[u8]>>) -> Self {
        Self {
            kid,
            thumbprint: None,
            algorithm: None,
            key_der: key_der.into(),
        }
    }

    /// Parse a single RSA JSON Web Key
    ///
    /// # Errors
    /// Fails for malformed JSON, non-RSA keys, keys not meant for signatures and
    /// oversized fields.
    pub fn from_jwk_json(json: &str) -> Result<Self> {
        let jwk: Jwk = miniserde::json::from_str(json)
            .map_err(|_| Error::RemoteError("jwk: invalid jwk json".into()))?;
        jwk.to_signing_key()
    }

    /// Set the `x5t` certificate thumbprint
    pub fn with_thumbprint(mut self, thumbprint: impl Into<String>) -> Self {
        self.thumbprint = Some(thumbprint.into());
        self
    }

    /// Restrict the key to one algorithm
    pub fn with_algorithm(mut self, algorithm: AlgorithmType) -> Self {
        self.algorithm = Some(algorithm.as_str().into());
        self
    }

    pub(crate) fn with_advertised_algorithm(mut self, algorithm: Option<String>) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn kid(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    pub fn thumbprint(&self) -> Option<&str> {
        self.thumbprint.as_deref()
    }

    /// Verify `signature` over `signing_input` with this key
    pub(crate) fn verify(
        &self,
        algorithm: AlgorithmType,
        signing_input: &str,
        signature: &str,
    ) -> Result<()> {
        if let Some(key_alg) = &self.algorithm {
            if key_alg != algorithm.as_str() {
                return Err(Error::JwkAlgorithmMismatch {
                    jwk_alg: key_alg.clone(),
                    token_alg: algorithm.as_str().into(),
                });
            }
        }
        algorithm.verify_signature(signing_input, signature, &self.key_der)
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("kid", &self.kid)
            .field("thumbprint", &self.thumbprint)
            .field("algorithm", &self.algorithm)
            .field("key_der_len", &self.key_der.len())
            .finish()
    }
}

/// Keys a token header may have been signed with
///
/// A `kid` or `x5t` in the header names exactly one key; a header naming neither
/// leaves every configured key as a candidate.
pub(crate) fn candidate_keys<'a>(
    keys: &'a [SigningKey],
    header: &TokenHeader,
) -> Result<Vec<&'a SigningKey>> {
    let not_found = || Error::SigningKeyNotFound {
        kid: header.key_id.clone(),
        thumbprint: header.thumbprint.clone(),
    };

    if header.key_id.is_none() && header.thumbprint.is_none() {
        if keys.is_empty() {
            return Err(not_found());
        }
        return Ok(keys.iter().collect());
    }

    let by_kid = header
        .key_id
        .as_deref()
        .map(|kid| matching(keys, kid, SigningKey::kid))
        .unwrap_or_default();
    let (id, matches) = if by_kid.is_empty() {
        let Some(thumbprint) = header.thumbprint.as_deref() else {
            return Err(not_found());
        };
        (thumbprint, matching(keys, thumbprint, SigningKey::thumbprint))
    } else {
        (header.key_id.as_deref().unwrap_or_default(), by_kid)
    };

    match matches.len() {
        0 => Err(not_found()),
        1 => Ok(matches),
        count => Err(Error::MultipleKeysFound {
            id: id.into(),
            count,
        }),
    }
}

fn matching<'a>(
    keys: &'a [SigningKey],
    id: &str,
    field: fn(&SigningKey) -> Option<&str>,
) -> Vec<&'a SigningKey> {
    keys.iter().filter(|key| field(key) == Some(id)).collect()
}

/// Verify the signature against the candidate keys
///
/// A single candidate reports its own failure; with several, the first key that
/// verifies wins and [`Error::SignatureInvalid`] is returned when none does.
pub(crate) fn verify_with_candidates(
    candidates: &[&SigningKey],
    algorithm: AlgorithmType,
    signing_input: &str,
    signature: &str,
) -> Result<()> {
    if let [key] = candidates {
        return key.verify(algorithm, signing_input, signature);
    }

    if candidates
        .iter()
        .any(|key| key.verify(algorithm, signing_input, signature).is_ok())
    {
        Ok(())
    } else {
        Err(Error::SignatureInvalid)
    }
}
