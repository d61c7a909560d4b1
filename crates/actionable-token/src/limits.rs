//! Input size limits

// ============================================================================
// Token
// ============================================================================

/// Maximum length of a compact token string (64KB)
pub(crate) const MAX_TOKEN_LENGTH: usize = 64 * 1024;

/// Maximum size of the decoded header JSON (8KB)
pub(crate) const MAX_DECODED_HEADER_SIZE: usize = 8 * 1024;

/// Maximum size of the decoded payload JSON (64KB)
pub(crate) const MAX_DECODED_PAYLOAD_SIZE: usize = 64 * 1024;

/// Maximum size of decoded signature bytes (1KB, an 8192-bit RSA signature)
pub(crate) const MAX_DECODED_SIGNATURE_SIZE: usize = 1024;

/// Maximum length of the Base64URL signature segment
pub(crate) const MAX_SIGNATURE_B64_SIZE: usize = 1536;

/// Maximum length of `alg` and `typ` header values
pub(crate) const MAX_ALG_LENGTH: usize = 16;

/// Maximum length of `kid` and `x5t` header values
pub(crate) const MAX_KID_LENGTH: usize = 256;

/// Maximum length of string claims (iss, sub, aud, jti, appid, sender)
pub(crate) const MAX_CLAIM_STRING_LENGTH: usize = 2048;

/// 1970-01-01 00:00:00 UTC
pub(crate) const MIN_TIMESTAMP: i64 = 0;

/// 2100-01-01 00:00:00 UTC
pub(crate) const MAX_TIMESTAMP: i64 = 4_102_444_800;

/// Upper bound for the clock skew tolerance (5 minutes)
pub(crate) const MAX_CLOCK_SKEW_SECONDS: u64 = 300;

// ============================================================================
// Remote configuration
// ============================================================================

/// Maximum length of the metadata URL
pub(crate) const MAX_METADATA_URL_LENGTH: usize = 2048;

/// Maximum length of the `jwks_uri` advertised by the metadata document
pub(crate) const MAX_JWKS_URI_LENGTH: usize = 2048;

/// Maximum size of the metadata document (64KB)
pub(crate) const MAX_DISCOVERY_RESPONSE_SIZE: usize = 64 * 1024;

/// Maximum size of the JWKS document (512KB)
pub(crate) const MAX_JWKS_RESPONSE_SIZE: usize = 512 * 1024;

/// Maximum number of keys in a JWK set
pub(crate) const MAX_JWK_SET_SIZE: usize = 100;

// ============================================================================
// JWK fields
// ============================================================================

/// Base64URL RSA modulus (covers 65536-bit keys)
pub(crate) const MAX_JWK_N_SIZE: usize = 12 * 1024;

/// Base64URL RSA exponent
pub(crate) const MAX_JWK_E_SIZE: usize = 64;

/// `kid` and `x5t` on a JWK
pub(crate) const MAX_JWK_KID_SIZE: usize = 256;

/// `alg` on a JWK
pub(crate) const MAX_JWK_ALG_SIZE: usize = 16;
