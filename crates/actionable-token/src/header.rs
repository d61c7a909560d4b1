use miniserde::Deserialize;

/// JOSE header of an actionable message token
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenHeader {
    #[serde(rename = "alg")]
    pub algorithm: String,

    #[serde(rename = "typ")]
    pub token_type: Option<String>,

    /// Key ID, matched against the `kid` of the configured signing keys
    #[serde(rename = "kid")]
    pub key_id: Option<String>,

    /// Base64URL SHA-1 certificate thumbprint, used when `kid` is absent
    #[serde(rename = "x5t")]
    pub thumbprint: Option<String>,
}
