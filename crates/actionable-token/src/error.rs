//! Errors for actionable-token

use thiserror::Error;

/// Reason a token was rejected
///
/// Every variant is an authentication outcome. The validator never returns these as
/// `Err`; they are carried by [`ValidationResult`](crate::ValidationResult) so callers
/// can audit rejections by cause.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // ============================================================================
    // Format Errors
    // ============================================================================
    #[error("Token too large: {size} bytes (maximum: {max} bytes)")]
    TokenTooLarge { size: usize, max: usize },

    #[error("Invalid JWT format: expected three parts separated by '.'")]
    FormatInvalid,

    #[error("Base64URL decoding failed: {0}")]
    FormatInvalidBase64(String),

    #[error("JSON parsing failed: {0}")]
    FormatInvalidJson(String),

    #[error("Signature Base64URL string too large: {size} bytes (maximum: {max} bytes)")]
    SignatureB64TooLarge { size: usize, max: usize },

    #[error("Header field '{field}' too long: {length} bytes (maximum: {max} bytes)")]
    HeaderFieldTooLong {
        field: String,
        length: usize,
        max: usize,
    },

    #[error("Token type '{found}' is not accepted (expected: '{expected}')")]
    TokenTypeInvalid { expected: String, found: String },

    // ============================================================================
    // Algorithm Errors
    // ============================================================================
    #[error("Algorithm '{0}' is not supported")]
    AlgorithmUnsupported(String),

    #[error("The 'none' algorithm is rejected: tokens must be signed")]
    AlgorithmNoneRejected,

    #[error("Algorithm '{found}' not allowed. Allowed: {allowed:?}")]
    AlgorithmNotAllowed { found: String, allowed: Vec<String> },

    // ============================================================================
    // Key and Signature Errors
    // ============================================================================
    #[error("Signing key not found (kid: {kid:?}, x5t: {thumbprint:?})")]
    SigningKeyNotFound {
        kid: Option<String>,
        thumbprint: Option<String>,
    },

    #[error("Multiple signing keys found for '{id}' ({count} matches)")]
    MultipleKeysFound { id: String, count: usize },

    #[error(
        "JWK algorithm mismatch: JWK alg '{jwk_alg}' doesn't match token algorithm '{token_alg}'"
    )]
    JwkAlgorithmMismatch { jwk_alg: String, token_alg: String },

    #[error("JWK field '{field}' too large: {size} bytes (maximum: {max} bytes)")]
    JwkFieldTooLarge {
        field: String,
        size: usize,
        max: usize,
    },

    #[error("Signature verification failed")]
    SignatureInvalid,

    // ============================================================================
    // Claim Errors
    // ============================================================================
    #[error("Token expired at {expired_at} (now: {now}, skew: {skew}s)")]
    TokenExpired {
        expired_at: i64,
        now: i64,
        skew: u64,
    },

    #[error("Token not valid until {not_before} (now: {now}, skew: {skew}s)")]
    TokenNotYetValid {
        not_before: i64,
        now: i64,
        skew: u64,
    },

    #[error("Token lifetime invalid: not before {not_before} is after expiration {expiration}")]
    TokenLifetimeInvalid { not_before: i64, expiration: i64 },

    #[error("Token audience mismatch: expected '{expected}', found '{found}'")]
    TokenAudienceMismatch { expected: String, found: String },

    #[error("Token issuer mismatch: expected '{expected}', found '{found}'")]
    TokenIssuerMismatch { expected: String, found: String },

    #[error("Required token claim '{0}' is missing")]
    TokenMissingClaim(String),

    #[error("Claim '{claim}' too long: {length} bytes (maximum: {max} bytes)")]
    ClaimStringTooLong {
        claim: String,
        length: usize,
        max: usize,
    },

    #[error("Timestamp out of bounds: {value} (valid range: {min} to {max})")]
    TimestampOutOfBounds { value: i64, min: i64, max: i64 },

    #[error("Integer overflow in timestamp arithmetic")]
    TimestampOverflow,

    #[error("Identity not found in the token")]
    IdentityNotFound,

    #[error("App ID does not match. Expected: {expected} Actual: {found:?}")]
    AppIdMismatch {
        expected: String,
        found: Option<String>,
    },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Issuer configuration unavailable: {0}")]
    ConfigurationUnavailable(String),

    #[error("Remote error: {0}")]
    RemoteError(String),

    #[error("Remote URL too long: {length} characters (maximum: {max} characters)")]
    RemoteUrlTooLong { length: usize, max: usize },

    #[error("Remote response too large: {size} bytes (maximum: {max} bytes)")]
    RemoteResponseTooLarge { size: usize, max: usize },

    #[error("Remote JWK set too large: {key_count} keys (maximum: {max} keys)")]
    RemoteJwkSetTooLarge { key_count: usize, max: usize },

    #[error("Clock skew too large: {value} seconds (maximum: {max} seconds)")]
    ClockSkewTooLarge { value: u64, max: u64 },
}

/// Caller programming errors
///
/// Returned as `Err` from [`TokenValidator::validate`](crate::TokenValidator::validate)
/// before any configuration is fetched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("token is null or empty")]
    TokenEmpty,

    #[error("target service base URL is null or empty")]
    AudienceEmpty,
}

/// Result type alias for actionable-token operations
pub type Result<T> = std::result::Result<T, Error>;
