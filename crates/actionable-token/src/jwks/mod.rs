//! JSON Web Key Set (JWKS) module
pub(crate) mod jwk;

use crate::error::{Error, Result};
use crate::jwks::jwk::Jwk;
use crate::keys::SigningKey;
use crate::limits::{MAX_JWK_SET_SIZE, MAX_JWKS_RESPONSE_SIZE};
use crate::url::validate_jwks_uri;
use miniserde::Deserialize;

/// GET `url` and return the body, refusing bodies above `max_size`
pub(crate) async fn fetch_url(
    client: &reqwest::Client,
    url: &str,
    max_size: usize,
) -> Result<Vec<u8>> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::RemoteError(format!("network: {e}")))?;

    if !response.status().is_success() {
        return Err(Error::RemoteError(format!(
            "http: status {}",
            response.status()
        )));
    }

    if let Some(length) = response.content_length() {
        let length = usize::try_from(length).unwrap_or(usize::MAX);
        if length > max_size {
            return Err(Error::RemoteResponseTooLarge {
                size: length,
                max: max_size,
            });
        }
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::RemoteError(format!("network: {e}")))?;

    if bytes.len() > max_size {
        return Err(Error::RemoteResponseTooLarge {
            size: bytes.len(),
            max: max_size,
        });
    }

    Ok(bytes.to_vec())
}

/// JSON Web Key Set (JWKS)
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct JwkSet {
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    pub(crate) fn from_json(json: &str) -> Result<Self> {
        let set: Self = miniserde::json::from_str(json)
            .map_err(|_| Error::RemoteError("jwks: invalid jwks json".into()))?;

        if set.keys.len() > MAX_JWK_SET_SIZE {
            return Err(Error::RemoteJwkSetTooLarge {
                key_count: set.keys.len(),
                max: MAX_JWK_SET_SIZE,
            });
        }

        Ok(set)
    }

    /// Usable signing keys of the set
    ///
    /// Keys that cannot verify RSA signatures (other key types, encryption keys,
    /// malformed components) are skipped.
    pub(crate) fn signing_keys(&self) -> Vec<SigningKey> {
        self.keys
            .iter()
            .filter_map(|jwk| match jwk.to_signing_key() {
                Ok(key) => Some(key),
                Err(e) => {
                    tracing::debug!(kid = ?jwk.kid, error = %e, "skipping unusable jwk");
                    None
                }
            })
            .collect()
    }
}

/// Fetch and parse the JWKS document at `jwks_uri`
pub(crate) async fn fetch_jwks(client: &reqwest::Client, jwks_uri: &str) -> Result<JwkSet> {
    validate_jwks_uri(jwks_uri)?;

    let bytes = fetch_url(client, jwks_uri, MAX_JWKS_RESPONSE_SIZE).await?;
    let body = std::str::from_utf8(&bytes)
        .map_err(|e| Error::RemoteError(format!("jwks: utf8 decode failed: {e}")))?;

    JwkSet::from_json(body)
}
