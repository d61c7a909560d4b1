//! Trust anchors for actionable message tokens
//!
//! The Office 365 token service publishes its signing keys behind an OpenID Connect
//! metadata document and stamps every actionable message token with a fixed issuer and
//! application id. Those values define the trust boundary and are collected here.

use crate::algorithm::AlgorithmPolicy;
use crate::error::{Error, Result};
use crate::limits::MAX_CLOCK_SKEW_SECONDS;

/// OpenID Connect metadata endpoint of the Office 365 token service
pub const METADATA_URL: &str =
    "https://substrate.office.com/sts/common/.well-known/openid-configuration";

/// Value of the `iss` claim
pub const TOKEN_ISSUER: &str = "https://substrate.office.com/sts/";

/// Value of the `appid` claim
pub const APP_ID: &str = "48af08dc-f6d2-435f-b2a7-069abd99c086";

/// Value of the `ver` claim
pub const TOKEN_VERSION: &str = "STI.ExternalAccessToken.V1";

/// Value of the `typ` header
pub const TOKEN_TYPE: &str = "JWT";

/// Value of the `alg` header
pub const SIGNING_ALGORITHM: &str = "RS256";

/// Clock skew applied to `exp` and `nbf` (5 minutes)
pub const CLOCK_SKEW_SECONDS: u64 = 300;

/// Immutable set of values a token must match to be trusted
///
/// Built once at startup and shared by `Arc` with every validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustAnchors {
    metadata_url: String,
    issuer: String,
    app_id: String,
    token_type: String,
    clock_skew_seconds: u64,
    algorithms: AlgorithmPolicy,
}

impl TrustAnchors {
    /// Anchors of the Office 365 token service
    pub fn office365() -> Self {
        Self {
            metadata_url: METADATA_URL.into(),
            issuer: TOKEN_ISSUER.into(),
            app_id: APP_ID.into(),
            token_type: TOKEN_TYPE.into(),
            clock_skew_seconds: CLOCK_SKEW_SECONDS,
            algorithms: AlgorithmPolicy::rs256_only(),
        }
    }

    pub fn with_metadata_url(mut self, url: impl Into<String>) -> Self {
        self.metadata_url = url.into();
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    pub fn with_algorithms(mut self, policy: AlgorithmPolicy) -> Self {
        self.algorithms = policy;
        self
    }

    /// Override the clock skew tolerance
    ///
    /// # Errors
    /// Values above 300 seconds are rejected with [`Error::ClockSkewTooLarge`].
    pub fn with_clock_skew(mut self, seconds: u64) -> Result<Self> {
        if seconds > MAX_CLOCK_SKEW_SECONDS {
            return Err(Error::ClockSkewTooLarge {
                value: seconds,
                max: MAX_CLOCK_SKEW_SECONDS,
            });
        }
        self.clock_skew_seconds = seconds;
        Ok(self)
    }

    pub fn metadata_url(&self) -> &str {
        &self.metadata_url
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    pub fn clock_skew_seconds(&self) -> u64 {
        self.clock_skew_seconds
    }

    pub fn algorithms(&self) -> &AlgorithmPolicy {
        &self.algorithms
    }
}

impl Default for TrustAnchors {
    fn default() -> Self {
        Self::office365()
    }
}
