//! Issuer configuration and the providers that supply it
//!
//! The validator asks a [`ConfigurationProvider`] for the current
//! [`IssuerConfiguration`] on every call. Refresh policy, caching and retries are the
//! provider's business; the validator never retries.

mod remote;

pub use remote::{RemoteConfigurationProvider, RemoteConfigurationProviderBuilder};

use crate::error::Result;
use crate::jwks::JwkSet;
use crate::keys::SigningKey;
use async_trait::async_trait;
use std::sync::Arc;

/// Signing keys and declared issuer of the token service
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IssuerConfiguration {
    issuer: Option<String>,
    signing_keys: Vec<SigningKey>,
}

impl IssuerConfiguration {
    pub fn new(issuer: Option<String>, signing_keys: Vec<SigningKey>) -> Self {
        Self {
            issuer,
            signing_keys,
        }
    }

    /// Build a configuration from a JWKS document
    ///
    /// Keys that cannot verify RSA signatures are skipped.
    ///
    /// # Errors
    /// Fails when the document is not a JWK set or holds too many keys.
    pub fn from_jwks_json(issuer: Option<String>, jwks: &str) -> Result<Self> {
        let set = JwkSet::from_json(jwks)?;
        Ok(Self::new(issuer, set.signing_keys()))
    }

    /// Issuer declared by the metadata document
    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }

    pub fn signing_keys(&self) -> &[SigningKey] {
        &self.signing_keys
    }
}

/// Source of the current issuer configuration
#[async_trait]
pub trait ConfigurationProvider: Send + Sync {
    /// Return the configuration to validate against right now
    async fn configuration(&self) -> Result<Arc<IssuerConfiguration>>;
}

/// Provider returning one fixed configuration
///
/// Useful for tests and for deployments that pin the token service's keys.
#[derive(Debug, Clone)]
pub struct StaticConfigurationProvider {
    configuration: Arc<IssuerConfiguration>,
}

impl StaticConfigurationProvider {
    pub fn new(configuration: IssuerConfiguration) -> Self {
        Self {
            configuration: Arc::new(configuration),
        }
    }
}

#[async_trait]
impl ConfigurationProvider for StaticConfigurationProvider {
    async fn configuration(&self) -> Result<Arc<IssuerConfiguration>> {
        Ok(Arc::clone(&self.configuration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

    #[tokio::test]
    async fn test_static_provider_returns_same_configuration() {
        let configuration = IssuerConfiguration::new(
            Some("https://substrate.office.com/sts/".into()),
            vec![SigningKey::from_der(Some("k1".into()), vec![0x30, 0x00])],
        );
        let provider = StaticConfigurationProvider::new(configuration.clone());

        let first = provider.configuration().await.unwrap();
        let second = provider.configuration().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, configuration);
    }

    #[test]
    fn test_configuration_from_jwks_json() {
        let jwks = format!(
            r#"{{"keys":[
                {{"kty":"RSA","use":"sig","kid":"k1","n":"{}","e":"AQAB"}},
                {{"kty":"RSA","use":"enc","kid":"k2","n":"{}","e":"AQAB"}}
            ]}}"#,
            URL_SAFE_NO_PAD.encode([0xC1; 256]),
            URL_SAFE_NO_PAD.encode([0xC3; 256]),
        );

        let configuration = IssuerConfiguration::from_jwks_json(None, &jwks).unwrap();
        assert_eq!(configuration.issuer(), None);
        assert_eq!(configuration.signing_keys().len(), 1);
        assert_eq!(configuration.signing_keys()[0].kid(), Some("k1"));
    }

    #[test]
    fn test_configuration_from_invalid_jwks() {
        assert!(IssuerConfiguration::from_jwks_json(None, "[]").is_err());
    }
}
