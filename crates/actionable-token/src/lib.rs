//! Validation of Office 365 actionable message tokens.
//!
//! An actionable message token is an RS256-signed JWT issued by the Office 365 token
//! service. [`TokenValidator::validate`] checks it against the service's published
//! signing keys and the fixed trust anchors, then reports the acting user and the
//! sender of the message.

mod error;
mod jwks;

// Internal modules
pub(crate) mod algorithm;
pub(crate) mod anchors;
pub(crate) mod audience;
pub(crate) mod claims;
pub(crate) mod discovery;
pub(crate) mod header;
pub(crate) mod keys;
pub(crate) mod provider;
pub(crate) mod result;
pub(crate) mod url;
pub(crate) mod utils;
pub(crate) mod validator;

// Public Interface
pub use algorithm::{AlgorithmPolicy, AlgorithmType};
pub use anchors::{
    APP_ID, CLOCK_SKEW_SECONDS, METADATA_URL, SIGNING_ALGORITHM, TOKEN_ISSUER, TOKEN_TYPE,
    TOKEN_VERSION, TrustAnchors,
};
pub use audience::Audience;
pub use claims::ActionableClaims;
pub use error::{ArgumentError, Error, Result};
pub use keys::SigningKey;
pub use provider::{
    ConfigurationProvider, IssuerConfiguration, RemoteConfigurationProvider,
    RemoteConfigurationProviderBuilder, StaticConfigurationProvider,
};
pub use result::ValidationResult;
pub use validator::TokenValidator;

pub use actionable_token_derive::claims;
pub use claims::StandardClaims;

pub(crate) mod limits;
