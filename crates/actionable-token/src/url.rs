//! URL validation for the metadata endpoint and the JWKS URI it advertises
//!
//! Both URLs are fetched by the remote configuration provider; the JWKS URI comes from
//! a network response, so scheme, host and length are checked before any request.

use crate::error::{Error, Result};
use crate::limits::{MAX_JWKS_URI_LENGTH, MAX_METADATA_URL_LENGTH};

fn validate_fetch_url(url: &str, max_length: usize, name: &str) -> Result<url::Url> {
    if url.trim().is_empty() {
        return Err(Error::RemoteError(format!("{name} cannot be empty")));
    }

    if url.len() > max_length {
        return Err(Error::RemoteUrlTooLong {
            length: url.len(),
            max: max_length,
        });
    }

    let parsed = url
        .parse::<url::Url>()
        .map_err(|e| Error::RemoteError(format!("invalid {name}: {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::RemoteError(format!(
            "{name} must use http or https scheme"
        )));
    }

    if parsed.host_str().is_none() {
        return Err(Error::RemoteError(format!("{name} must have a valid host")));
    }

    Ok(parsed)
}

pub(crate) fn validate_metadata_url(url: &str) -> Result<()> {
    validate_fetch_url(url, MAX_METADATA_URL_LENGTH, "metadata URL").map(|_| ())
}

pub(crate) fn validate_jwks_uri(uri: &str) -> Result<()> {
    validate_fetch_url(uri, MAX_JWKS_URI_LENGTH, "JWKS URI").map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchors::METADATA_URL;

    #[test]
    fn test_metadata_url_valid() {
        assert!(validate_metadata_url(METADATA_URL).is_ok());
        assert!(validate_metadata_url("http://127.0.0.1:8080/.well-known/openid-configuration").is_ok());
    }

    #[test]
    fn test_empty_urls() {
        assert!(validate_metadata_url("").is_err());
        assert!(validate_jwks_uri("   ").is_err());
    }

    #[test]
    fn test_invalid_scheme() {
        assert!(
            matches!(validate_jwks_uri("file:///etc/passwd"), Err(Error::RemoteError(msg)) if msg.contains("scheme"))
        );
        assert!(validate_metadata_url("ftp://example.com/config").is_err());
    }

    #[test]
    fn test_unparseable_url() {
        assert!(validate_jwks_uri("https://").is_err());
        assert!(validate_jwks_uri("not a url").is_err());
    }

    #[test]
    fn test_url_too_long() {
        let long_uri = format!("https://example.com/{}", "a".repeat(MAX_JWKS_URI_LENGTH));
        assert!(matches!(
            validate_jwks_uri(&long_uri),
            Err(Error::RemoteUrlTooLong { .. })
        ));
    }
}
