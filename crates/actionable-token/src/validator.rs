use crate::algorithm::AlgorithmType;
use crate::anchors::TrustAnchors;
use crate::claims::{
    ActionableClaims, StandardClaims, ValidationParameters, current_timestamp, validate_claims,
};
use crate::error::{ArgumentError, Error, Result};
use crate::header::TokenHeader;
use crate::keys::{candidate_keys, verify_with_candidates};
use crate::limits::{
    MAX_ALG_LENGTH, MAX_DECODED_HEADER_SIZE, MAX_DECODED_PAYLOAD_SIZE, MAX_KID_LENGTH,
    MAX_SIGNATURE_B64_SIZE, MAX_TOKEN_LENGTH,
};
use crate::provider::{ConfigurationProvider, RemoteConfigurationProvider};
use crate::result::ValidationResult;
use crate::utils::base64url;
use crate::utils::bounds::validate_header_field;
use std::fmt;
use std::sync::Arc;

/// Validator for actionable message tokens
///
/// Configured once and shared; every call asks the provider for the current issuer
/// configuration and otherwise holds no mutable state, so clones and concurrent calls
/// are independent.
#[derive(Clone)]
pub struct TokenValidator {
    anchors: Arc<TrustAnchors>,
    provider: Arc<dyn ConfigurationProvider>,
}

/// Token split into its segments, with the header checked and the payload parsed
struct ParsedToken<'a> {
    signing_input: &'a str,
    signature_b64: &'a str,
    header: TokenHeader,
    algorithm: AlgorithmType,
    claims: ActionableClaims,
}

impl TokenValidator {
    /// Create a validator using the Office 365 trust anchors
    pub fn new(provider: Arc<dyn ConfigurationProvider>) -> Self {
        Self {
            anchors: Arc::new(TrustAnchors::office365()),
            provider,
        }
    }

    /// Validator fetching keys from the Office 365 metadata endpoint
    pub fn office365(client: reqwest::Client) -> Self {
        Self::remote(client, TrustAnchors::office365())
    }

    /// Validator fetching keys from the metadata endpoint named by `anchors`
    pub fn remote(client: reqwest::Client, anchors: TrustAnchors) -> Self {
        let provider = RemoteConfigurationProvider::builder(anchors.metadata_url())
            .client(client)
            .build();
        Self {
            anchors: Arc::new(anchors),
            provider: Arc::new(provider),
        }
    }

    /// Configure the trust anchors
    pub fn anchors(&mut self, anchors: TrustAnchors) -> &mut Self {
        self.anchors = Arc::new(anchors);
        self
    }

    pub fn build(&mut self) -> Self {
        self.clone()
    }

    pub fn trust_anchors(&self) -> &TrustAnchors {
        &self.anchors
    }
}

impl TokenValidator {
    /// Validate a token presented to the service at `target_audience`
    ///
    /// Rejections are reported through the returned [`ValidationResult`]; only empty
    /// arguments are returned as `Err`, before any configuration is fetched.
    pub async fn validate(
        &self,
        token: &str,
        target_audience: &str,
    ) -> std::result::Result<ValidationResult, ArgumentError> {
        if token.is_empty() {
            return Err(ArgumentError::TokenEmpty);
        }
        if target_audience.is_empty() {
            return Err(ArgumentError::AudienceEmpty);
        }

        Ok(match self.validate_token(token, target_audience).await {
            Ok(claims) => extract_identities(claims),
            Err(error) => {
                tracing::warn!(%error, audience = target_audience, "token rejected");
                ValidationResult::failure(error)
            }
        })
    }

    async fn validate_token(&self, token: &str, target_audience: &str) -> Result<ActionableClaims> {
        // 1. Current issuer configuration, never retried here
        let configuration = self
            .provider
            .configuration()
            .await
            .map_err(|e| Error::ConfigurationUnavailable(e.to_string()))?;

        let params = ValidationParameters {
            issuer: self.anchors.issuer(),
            audience: target_audience,
            token_type: self.anchors.token_type(),
            clock_skew_seconds: self.anchors.clock_skew_seconds(),
            algorithms: self.anchors.algorithms(),
            signing_keys: configuration.signing_keys(),
        };

        // 2. Structure, header policy, signature and registered claims
        let parsed = parse_token(token, &params)?;
        let candidates = candidate_keys(params.signing_keys, &parsed.header)?;
        verify_with_candidates(
            &candidates,
            parsed.algorithm,
            parsed.signing_input,
            parsed.signature_b64,
        )?;
        validate_claims(&parsed.claims, &params, current_timestamp())?;

        // 3. Acting user
        if parsed.claims.subject().is_none() {
            return Err(Error::IdentityNotFound);
        }

        // 4. Issuing application
        let app_id = parsed.claims.app_id.as_deref();
        if !app_id.is_some_and(|found| found.eq_ignore_ascii_case(self.anchors.app_id())) {
            return Err(Error::AppIdMismatch {
                expected: self.anchors.app_id().into(),
                found: app_id.map(Into::into),
            });
        }

        Ok(parsed.claims)
    }
}

impl fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenValidator")
            .field("anchors", &self.anchors)
            .finish_non_exhaustive()
    }
}

fn extract_identities(claims: ActionableClaims) -> ValidationResult {
    match claims.subject {
        Some(performer) => ValidationResult::success(performer, claims.sender),
        None => ValidationResult::failure(Error::IdentityNotFound),
    }
}

/// Split and decode a compact token, enforcing the header policy
fn parse_token<'a>(token: &'a str, params: &ValidationParameters<'_>) -> Result<ParsedToken<'a>> {
    if token.len() > MAX_TOKEN_LENGTH {
        return Err(Error::TokenTooLarge {
            size: token.len(),
            max: MAX_TOKEN_LENGTH,
        });
    }

    let (signing_input, signature_b64) = token.rsplit_once('.').ok_or(Error::FormatInvalid)?;
    let (header_b64, payload_b64) = signing_input
        .split_once('.')
        .ok_or(Error::FormatInvalid)?;
    if payload_b64.contains('.') || header_b64.is_empty() || signature_b64.is_empty() {
        return Err(Error::FormatInvalid);
    }

    if signature_b64.len() > MAX_SIGNATURE_B64_SIZE {
        return Err(Error::SignatureB64TooLarge {
            size: signature_b64.len(),
            max: MAX_SIGNATURE_B64_SIZE,
        });
    }

    let header_json = base64url::decode_string("header", header_b64, MAX_DECODED_HEADER_SIZE)?;
    let header: TokenHeader = miniserde::json::from_str(&header_json)
        .map_err(|e| Error::FormatInvalidJson(format!("Failed to parse header: {e}")))?;

    validate_header_field("alg", &header.algorithm, MAX_ALG_LENGTH)?;
    if let Some(kid) = &header.key_id {
        validate_header_field("kid", kid, MAX_KID_LENGTH)?;
    }
    if let Some(x5t) = &header.thumbprint {
        validate_header_field("x5t", x5t, MAX_KID_LENGTH)?;
    }
    if let Some(typ) = &header.token_type {
        if !typ.eq_ignore_ascii_case(params.token_type) {
            return Err(Error::TokenTypeInvalid {
                expected: params.token_type.into(),
                found: typ.clone(),
            });
        }
    }

    let algorithm = AlgorithmType::from_str(&header.algorithm)?;
    params.algorithms.validate(algorithm)?;

    let payload_json = base64url::decode_string("payload", payload_b64, MAX_DECODED_PAYLOAD_SIZE)?;
    let claims: ActionableClaims = miniserde::json::from_str(&payload_json)
        .map_err(|e| Error::FormatInvalidJson(format!("Failed to parse payload: {e}")))?;
    claims.validate_string_lengths()?;

    Ok(ParsedToken {
        signing_input,
        signature_b64,
        header,
        algorithm,
        claims,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::AlgorithmPolicy;
    use crate::provider::{IssuerConfiguration, StaticConfigurationProvider};
    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

    fn encode(json: &str) -> String {
        URL_SAFE_NO_PAD.encode(json)
    }

    fn params(policy: &AlgorithmPolicy) -> ValidationParameters<'_> {
        ValidationParameters {
            issuer: "https://substrate.office.com/sts/",
            audience: "https://api.contoso.com",
            token_type: "JWT",
            clock_skew_seconds: 300,
            algorithms: policy,
            signing_keys: &[],
        }
    }

    fn token(header: &str, payload: &str) -> String {
        format!("{}.{}.c2ln", encode(header), encode(payload))
    }

    #[test]
    fn test_parse_token_segments() {
        let policy = AlgorithmPolicy::default();
        let token = token(
            r#"{"alg":"RS256","typ":"JWT","kid":"k1"}"#,
            r#"{"sub":"john@contoso.com"}"#,
        );
        let parsed = parse_token(&token, &params(&policy)).unwrap();

        assert_eq!(parsed.algorithm, AlgorithmType::RS256);
        assert_eq!(parsed.header.key_id.as_deref(), Some("k1"));
        assert_eq!(parsed.signature_b64, "c2ln");
        assert_eq!(parsed.claims.subject(), Some("john@contoso.com"));
        assert!(token.starts_with(parsed.signing_input));
    }

    #[test]
    fn test_parse_rejects_wrong_segment_count() {
        let policy = AlgorithmPolicy::default();
        for token in ["abc", "a.b", "a.b.c.d", ".b.c", "a.b."] {
            assert_eq!(
                parse_token(token, &params(&policy)).err(),
                Some(Error::FormatInvalid),
                "{token}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_oversized_token() {
        let policy = AlgorithmPolicy::default();
        let token = "a".repeat(MAX_TOKEN_LENGTH + 1);
        assert!(matches!(
            parse_token(&token, &params(&policy)),
            Err(Error::TokenTooLarge { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_token_type() {
        let policy = AlgorithmPolicy::default();
        let token = token(r#"{"alg":"RS256","typ":"at+jwt"}"#, "{}");
        assert!(matches!(
            parse_token(&token, &params(&policy)),
            Err(Error::TokenTypeInvalid { found, .. }) if found == "at+jwt"
        ));

        let lowercase = token_with_typ("jwt");
        assert!(parse_token(&lowercase, &params(&policy)).is_ok());
    }

    fn token_with_typ(typ: &str) -> String {
        token(&format!(r#"{{"alg":"RS256","typ":"{typ}"}}"#), "{}")
    }

    #[test]
    fn test_parse_enforces_algorithm_policy() {
        let policy = AlgorithmPolicy::default();
        let none = token(r#"{"alg":"none"}"#, "{}");
        assert_eq!(
            parse_token(&none, &params(&policy)).err(),
            Some(Error::AlgorithmNoneRejected)
        );

        let hmac = token(r#"{"alg":"HS256"}"#, "{}");
        assert!(matches!(
            parse_token(&hmac, &params(&policy)),
            Err(Error::AlgorithmUnsupported(_))
        ));

        let rs384 = token(r#"{"alg":"RS384"}"#, "{}");
        assert!(matches!(
            parse_token(&rs384, &params(&policy)),
            Err(Error::AlgorithmNotAllowed { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_bad_encoding() {
        let policy = AlgorithmPolicy::default();
        assert!(matches!(
            parse_token("!!!.e30.c2ln", &params(&policy)),
            Err(Error::FormatInvalidBase64(_))
        ));

        let not_json = format!("{}.e30.c2ln", encode("not json"));
        assert!(matches!(
            parse_token(&not_json, &params(&policy)),
            Err(Error::FormatInvalidJson(_))
        ));
    }

    #[test]
    fn test_parse_rejects_long_kid() {
        let policy = AlgorithmPolicy::default();
        let header = format!(r#"{{"alg":"RS256","kid":"{}"}}"#, "k".repeat(MAX_KID_LENGTH + 1));
        assert!(matches!(
            parse_token(&token(&header, "{}"), &params(&policy)),
            Err(Error::HeaderFieldTooLong { field, .. }) if field == "kid"
        ));
    }

    #[tokio::test]
    async fn test_empty_arguments_rejected_before_fetch() {
        let validator = TokenValidator::new(Arc::new(StaticConfigurationProvider::new(
            IssuerConfiguration::default(),
        )));
        assert_eq!(
            validator.validate("", "https://api.contoso.com").await,
            Err(ArgumentError::TokenEmpty)
        );
        assert_eq!(
            validator.validate("a.b.c", "").await,
            Err(ArgumentError::AudienceEmpty)
        );
    }

    #[tokio::test]
    async fn test_empty_key_set_finds_no_key() {
        let validator = TokenValidator::new(Arc::new(StaticConfigurationProvider::new(
            IssuerConfiguration::default(),
        )));
        let token = token(r#"{"alg":"RS256","kid":"k1"}"#, r#"{"sub":"a"}"#);
        let result = validator
            .validate(&token, "https://api.contoso.com")
            .await
            .unwrap();

        assert!(!result.validation_succeeded());
        assert!(matches!(
            result.error(),
            Some(Error::SigningKeyNotFound { kid: Some(kid), .. }) if kid == "k1"
        ));
    }

    #[test]
    fn test_builder_overrides_anchors() {
        let validator = TokenValidator::new(Arc::new(StaticConfigurationProvider::new(
            IssuerConfiguration::default(),
        )))
        .anchors(TrustAnchors::office365().with_app_id("app"))
        .build();
        assert_eq!(validator.trust_anchors().app_id(), "app");
    }

    #[test]
    fn test_remote_uses_anchor_metadata_url() {
        let anchors = TrustAnchors::office365().with_metadata_url("https://sts.test/metadata");
        let validator = TokenValidator::remote(reqwest::Client::new(), anchors);
        assert_eq!(
            validator.trust_anchors().metadata_url(),
            "https://sts.test/metadata"
        );
        assert!(format!("{validator:?}").contains("sts.test"));
    }
}
