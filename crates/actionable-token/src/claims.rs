//! Token payload and claim checks
//!
//! Registered claims (`iss`, `sub`, `aud`, `exp`, `nbf`, `iat`, `jti`) are generated by
//! the `#[claims]` macro and read through [`StandardClaims`]. Lifetime checks widen both
//! bounds by the configured clock skew: a token is accepted while
//! `nbf - skew <= now <= exp + skew`.

use crate::algorithm::AlgorithmPolicy;
use crate::audience::Audience;
use crate::error::{Error, Result};
use crate::keys::SigningKey;
use crate::limits::MAX_CLAIM_STRING_LENGTH;
use crate::utils::bounds::{apply_clock_skew, validate_claim_length, validate_timestamp_bounds};
use std::time::{SystemTime, UNIX_EPOCH};

// Alias to allow macro-generated code to reference actionable_token::StandardClaims within this crate
use crate as actionable_token;

/// The registered JWT claims
pub trait StandardClaims {
    /// Issuer (iss)
    fn issuer(&self) -> Option<&str>;
    /// Subject (sub); the acting user of an actionable message
    fn subject(&self) -> Option<&str>;
    /// Audience (aud) when the token names exactly one
    fn audience(&self) -> Option<&str>;
    /// Audience (aud) in either wire form; the base URL of the target service
    fn audiences(&self) -> Option<&Audience>;
    /// Expiration Time (exp), seconds since the Unix epoch
    fn expiration(&self) -> Option<i64>;
    /// Not Before (nbf), seconds since the Unix epoch
    fn not_before(&self) -> Option<i64>;
    /// Issued At (iat), seconds since the Unix epoch
    fn issued_at(&self) -> Option<i64>;
    /// JWT ID (jti)
    fn jwt_id(&self) -> Option<&str>;
}

/// Payload of an actionable message token
#[actionable_token_derive::claims]
pub struct ActionableClaims {
    /// Application the token was issued to
    #[serde(rename = "appid")]
    pub app_id: Option<String>,
    /// Sender of the actionable message
    #[serde(rename = "sender")]
    pub sender: Option<String>,
    #[serde(rename = "ver")]
    pub version: Option<String>,
    #[serde(rename = "appidacr")]
    pub app_auth_context_class: Option<String>,
    #[serde(rename = "acr")]
    pub auth_context_class: Option<String>,
}

impl ActionableClaims {
    /// Bound every string claim to prevent oversized values reaching callers
    pub(crate) fn validate_string_lengths(&self) -> Result<()> {
        let audiences = self.audiences().into_iter().flat_map(Audience::iter);
        let claims = [
            ("iss", self.issuer()),
            ("sub", self.subject()),
            ("jti", self.jwt_id()),
            ("appid", self.app_id.as_deref()),
            ("sender", self.sender.as_deref()),
            ("ver", self.version.as_deref()),
        ];

        for (name, value) in claims {
            if let Some(value) = value {
                validate_claim_length(name, value, MAX_CLAIM_STRING_LENGTH)?;
            }
        }
        for value in audiences {
            validate_claim_length("aud", value, MAX_CLAIM_STRING_LENGTH)?;
        }
        Ok(())
    }
}

/// Constraints applied to one validation call
///
/// Built fresh for every call from the trust anchors, the caller's audience and the
/// signing keys of the current issuer configuration.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ValidationParameters<'a> {
    pub issuer: &'a str,
    pub audience: &'a str,
    pub token_type: &'a str,
    pub clock_skew_seconds: u64,
    pub algorithms: &'a AlgorithmPolicy,
    pub signing_keys: &'a [SigningKey],
}

/// Check lifetime, audience and issuer of a signature-verified payload
///
/// Issuer and audience are compared ordinally (case-sensitive); an array audience
/// matches when any entry does.
pub(crate) fn validate_claims(
    claims: &impl StandardClaims,
    params: &ValidationParameters<'_>,
    now: i64,
) -> Result<()> {
    let skew = params.clock_skew_seconds;

    let expiration = claims
        .expiration()
        .ok_or_else(|| Error::TokenMissingClaim("exp".into()))?;
    validate_timestamp_bounds(expiration)?;
    if now > apply_clock_skew(expiration, skew, true)? {
        return Err(Error::TokenExpired {
            expired_at: expiration,
            now,
            skew,
        });
    }

    if let Some(not_before) = claims.not_before() {
        validate_timestamp_bounds(not_before)?;
        if not_before > expiration {
            return Err(Error::TokenLifetimeInvalid {
                not_before,
                expiration,
            });
        }
        if now < apply_clock_skew(not_before, skew, false)? {
            return Err(Error::TokenNotYetValid {
                not_before,
                now,
                skew,
            });
        }
    }

    if let Some(issued_at) = claims.issued_at() {
        validate_timestamp_bounds(issued_at)?;
    }

    let audience = claims
        .audiences()
        .ok_or_else(|| Error::TokenMissingClaim("aud".into()))?;
    if !audience.contains(params.audience) {
        return Err(Error::TokenAudienceMismatch {
            expected: params.audience.into(),
            found: audience.to_string(),
        });
    }

    let issuer = claims
        .issuer()
        .ok_or_else(|| Error::TokenMissingClaim("iss".into()))?;
    if issuer != params.issuer {
        return Err(Error::TokenIssuerMismatch {
            expected: params.issuer.into(),
            found: issuer.into(),
        });
    }

    Ok(())
}

/// Current Unix timestamp
pub(crate) fn current_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
