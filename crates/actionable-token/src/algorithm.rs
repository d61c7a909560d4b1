//! Signature algorithms accepted for actionable message tokens
use crate::error::{Error, Result};
use crate::limits::{MAX_ALG_LENGTH, MAX_DECODED_SIGNATURE_SIZE};
use crate::utils::base64url;

use aws_lc_rs::signature::{self, UnparsedPublicKey};

/// Algorithm identifier from the token header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmType {
    RS256,
    RS384,
    RS512,
}

impl AlgorithmType {
    pub(crate) fn from_str(s: &str) -> Result<Self> {
        if s.len() > MAX_ALG_LENGTH {
            return Err(Error::AlgorithmUnsupported(format!(
                "Algorithm string too long: {} bytes (maximum: {MAX_ALG_LENGTH} bytes)",
                s.len()
            )));
        }

        match s {
            "none" => Err(Error::AlgorithmNoneRejected),
            "RS256" => Ok(Self::RS256),
            "RS384" => Ok(Self::RS384),
            "RS512" => Ok(Self::RS512),
            _ => Err(Error::AlgorithmUnsupported(s.into())),
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
        }
    }

    fn verification_algorithm(&self) -> &'static dyn signature::VerificationAlgorithm {
        match self {
            Self::RS256 => &signature::RSA_PKCS1_2048_8192_SHA256,
            Self::RS384 => &signature::RSA_PKCS1_2048_8192_SHA384,
            Self::RS512 => &signature::RSA_PKCS1_2048_8192_SHA512,
        }
    }

    /// Verify a Base64URL signature over `signing_input` (`header.payload`)
    ///
    /// `key_der` is a DER SubjectPublicKeyInfo (or PKCS#1 RSAPublicKey).
    pub(crate) fn verify_signature(
        &self,
        signing_input: &str,
        signature: &str,
        key_der: &[u8],
    ) -> Result<()> {
        let signature_bytes =
            base64url::decode_bytes("signature", signature, MAX_DECODED_SIGNATURE_SIZE)?;

        UnparsedPublicKey::new(self.verification_algorithm(), key_der)
            .verify(signing_input.as_bytes(), &signature_bytes)
            .map_err(|_| Error::SignatureInvalid)
    }
}

impl std::fmt::Display for AlgorithmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of algorithms a validator accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmPolicy {
    allowed: Vec<AlgorithmType>,
}

impl AlgorithmPolicy {
    /// Only RS256, the algorithm the Office 365 token service signs with
    pub fn rs256_only() -> Self {
        Self::allow_only(vec![AlgorithmType::RS256])
    }

    /// RS256, RS384 and RS512
    pub fn rsa_all() -> Self {
        Self::allow_only(vec![
            AlgorithmType::RS256,
            AlgorithmType::RS384,
            AlgorithmType::RS512,
        ])
    }

    pub fn allow_only(algorithms: Vec<AlgorithmType>) -> Self {
        Self {
            allowed: algorithms,
        }
    }

    pub(crate) fn validate(&self, algorithm: AlgorithmType) -> Result<()> {
        if self.allowed.contains(&algorithm) {
            Ok(())
        } else {
            Err(Error::AlgorithmNotAllowed {
                found: algorithm.to_string(),
                allowed: self.allowed.iter().map(ToString::to_string).collect(),
            })
        }
    }
}

impl Default for AlgorithmPolicy {
    fn default() -> Self {
        Self::rs256_only()
    }
}
