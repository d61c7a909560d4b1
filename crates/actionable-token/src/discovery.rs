//! OpenID Connect metadata document
//!
//! Only the two members the validator needs are read: the declared `issuer` and the
//! `jwks_uri` the signing keys are published at.

use crate::error::{Error, Result};
use crate::jwks::fetch_url;
use crate::limits::MAX_DISCOVERY_RESPONSE_SIZE;
use crate::url::{validate_jwks_uri, validate_metadata_url};
use miniserde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ProviderMetadata {
    pub issuer: Option<String>,
    pub jwks_uri: String,
}

/// Fetch the metadata document at `metadata_url`
///
/// No caching happens here; the remote provider caches the complete configuration.
pub(crate) async fn fetch_metadata(
    client: &reqwest::Client,
    metadata_url: &str,
) -> Result<ProviderMetadata> {
    validate_metadata_url(metadata_url)?;

    let bytes = fetch_url(client, metadata_url, MAX_DISCOVERY_RESPONSE_SIZE).await?;
    let body = std::str::from_utf8(&bytes)
        .map_err(|e| Error::RemoteError(format!("discovery: utf8 decode failed: {e}")))?;

    let metadata: ProviderMetadata = miniserde::json::from_str(body)
        .map_err(|_| Error::RemoteError("discovery: invalid metadata json".into()))?;

    if metadata.jwks_uri.trim().is_empty() {
        return Err(Error::RemoteError(
            "discovery: missing or empty jwks_uri".into(),
        ));
    }
    validate_jwks_uri(&metadata.jwks_uri)?;

    Ok(metadata)
}
