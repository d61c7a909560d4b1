use super::{ConfigurationProvider, IssuerConfiguration};
use crate::anchors::METADATA_URL;
use crate::discovery::fetch_metadata;
use crate::error::{Error, Result};
use crate::jwks::fetch_jwks;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long a fetched configuration is served before it is fetched again
const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Minimum age of a configuration before `request_refresh` discards it
const DEFAULT_MINIMUM_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CachedConfiguration {
    configuration: Arc<IssuerConfiguration>,
    fetched_at: Instant,
}

/// Provider backed by an OpenID Connect metadata endpoint
///
/// The metadata document names the JWKS URI; both are fetched on a cache miss and the
/// resulting configuration is cached for the refresh interval. Concurrent misses share
/// one fetch. Failed fetches are not cached. Clones share the cache.
#[derive(Debug, Clone)]
pub struct RemoteConfigurationProvider {
    client: reqwest::Client,
    metadata_url: String,
    cache: Cache<String, CachedConfiguration>,
    minimum_refresh_interval: Duration,
}

impl RemoteConfigurationProvider {
    /// Provider for the Office 365 token service metadata endpoint
    pub fn office365(client: reqwest::Client) -> Self {
        Self::builder(METADATA_URL).client(client).build()
    }

    pub fn builder(metadata_url: impl Into<String>) -> RemoteConfigurationProviderBuilder {
        RemoteConfigurationProviderBuilder::new(metadata_url)
    }

    pub fn metadata_url(&self) -> &str {
        &self.metadata_url
    }

    /// Discard the cached configuration so the next call fetches it again
    ///
    /// Intended for callers that suspect a key rotation (a token naming an unknown
    /// key). Requests are ignored while the cached configuration is younger than the
    /// minimum refresh interval. Returns whether the next call will fetch.
    pub async fn request_refresh(&self) -> bool {
        match self.cache.get(&self.metadata_url).await {
            Some(cached) if cached.fetched_at.elapsed() < self.minimum_refresh_interval => {
                tracing::debug!(
                    metadata_url = %self.metadata_url,
                    "refresh request ignored: configuration fetched recently"
                );
                false
            }
            Some(_) => {
                self.cache.invalidate(&self.metadata_url).await;
                tracing::debug!(metadata_url = %self.metadata_url, "issuer configuration invalidated");
                true
            }
            None => true,
        }
    }

    async fn fetch(&self) -> Result<CachedConfiguration> {
        tracing::debug!(metadata_url = %self.metadata_url, "fetching issuer configuration");

        let metadata = fetch_metadata(&self.client, &self.metadata_url).await?;
        let jwks = fetch_jwks(&self.client, &metadata.jwks_uri).await?;

        let signing_keys = jwks.signing_keys();
        if signing_keys.is_empty() {
            return Err(Error::RemoteError(format!(
                "jwks: no usable signing keys at {}",
                metadata.jwks_uri
            )));
        }

        tracing::debug!(
            jwks_uri = %metadata.jwks_uri,
            keys = signing_keys.len(),
            "issuer configuration fetched"
        );

        Ok(CachedConfiguration {
            configuration: Arc::new(IssuerConfiguration::new(metadata.issuer, signing_keys)),
            fetched_at: Instant::now(),
        })
    }
}

#[async_trait]
impl ConfigurationProvider for RemoteConfigurationProvider {
    async fn configuration(&self) -> Result<Arc<IssuerConfiguration>> {
        self.cache
            .try_get_with(self.metadata_url.clone(), self.fetch())
            .await
            .map(|cached| cached.configuration)
            .map_err(|e| Error::clone(&e))
    }
}

/// Builder for [`RemoteConfigurationProvider`]
#[derive(Debug, Clone)]
pub struct RemoteConfigurationProviderBuilder {
    metadata_url: String,
    client: Option<reqwest::Client>,
    refresh_interval: Duration,
    minimum_refresh_interval: Duration,
}

impl RemoteConfigurationProviderBuilder {
    fn new(metadata_url: impl Into<String>) -> Self {
        Self {
            metadata_url: metadata_url.into(),
            client: None,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            minimum_refresh_interval: DEFAULT_MINIMUM_REFRESH_INTERVAL,
        }
    }

    /// HTTP client used for both documents
    pub fn client(&mut self, client: reqwest::Client) -> &mut Self {
        self.client = Some(client);
        self
    }

    /// Time a fetched configuration is served from cache (default: 24 hours)
    pub fn refresh_interval(&mut self, interval: Duration) -> &mut Self {
        self.refresh_interval = interval;
        self
    }

    /// Minimum configuration age honoured by `request_refresh` (default: 5 minutes)
    pub fn minimum_refresh_interval(&mut self, interval: Duration) -> &mut Self {
        self.minimum_refresh_interval = interval;
        self
    }

    pub fn build(&self) -> RemoteConfigurationProvider {
        RemoteConfigurationProvider {
            client: self.client.clone().unwrap_or_default(),
            metadata_url: self.metadata_url.clone(),
            cache: Cache::builder()
                .max_capacity(1)
                .time_to_live(self.refresh_interval)
                .build(),
            minimum_refresh_interval: self.minimum_refresh_interval,
        }
    }
}
