//! Token and key fixtures for integration tests
//!
//! Keys are generated once per test binary. Tokens are built from JSON values and
//! signed locally, so every test runs without network access.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::{SystemTime, UNIX_EPOCH};

use actionable_token::{
    APP_ID, ConfigurationProvider, Error, IssuerConfiguration, SigningKey,
    StaticConfigurationProvider, TOKEN_ISSUER, TOKEN_VERSION, TokenValidator,
};
use async_trait::async_trait;
use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{
    RSA_PKCS1_SHA256, RSA_PKCS1_SHA384, RSA_PKCS1_SHA512, RsaEncoding, RsaKeyPair,
};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rsa::pkcs8::EncodePrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use serde_json::{Value, json};

pub const AUDIENCE: &str = "https://api.contoso.com";
pub const ACTION_PERFORMER: &str = "john@contoso.com";
pub const SENDER: &str = "nicole@contoso.com";

/// RSA key pair with its JWK representation
pub struct TestKey {
    pub kid: String,
    pub pair: RsaKeyPair,
    pub jwk: String,
}

impl TestKey {
    fn generate(kid: &str) -> Self {
        let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap();
        let public_key = private_key.to_public_key();
        let pkcs8 = private_key.to_pkcs8_der().unwrap();
        let pair = RsaKeyPair::from_pkcs8(pkcs8.as_bytes()).unwrap();

        let jwk = json!({
            "kty": "RSA",
            "use": "sig",
            "kid": kid,
            "x5t": kid,
            "n": URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be()),
            "e": URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be()),
        });

        Self {
            kid: kid.into(),
            pair,
            jwk: jwk.to_string(),
        }
    }

    pub fn signing_key(&self) -> SigningKey {
        SigningKey::from_jwk_json(&self.jwk).unwrap()
    }
}

/// Key the test token service signs with and publishes
pub static SIGNING_KEY: LazyLock<TestKey> = LazyLock::new(|| TestKey::generate("primary"));

/// Key the test token service does not publish
pub static UNTRUSTED_KEY: LazyLock<TestKey> = LazyLock::new(|| TestKey::generate("untrusted"));

pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Builder for signed actionable message tokens
pub struct TokenBuilder {
    header: Value,
    claims: Value,
    key: &'static TestKey,
}

impl TokenBuilder {
    /// Token as issued by the Office 365 token service, valid for one hour
    pub fn new() -> Self {
        let now = now();
        let key = &*SIGNING_KEY;
        Self {
            header: json!({
                "typ": "JWT",
                "alg": "RS256",
                "x5t": key.kid,
                "kid": key.kid,
            }),
            claims: json!({
                "iat": now,
                "nbf": now,
                "exp": now + 3600,
                "ver": TOKEN_VERSION,
                "appid": APP_ID,
                "iss": TOKEN_ISSUER,
                "appidacr": "2",
                "acr": "0",
                "sub": ACTION_PERFORMER,
                "sender": SENDER,
                "aud": AUDIENCE,
            }),
            key,
        }
    }

    pub fn claim(mut self, name: &str, value: Value) -> Self {
        self.claims[name] = value;
        self
    }

    pub fn without_claim(mut self, name: &str) -> Self {
        if let Some(claims) = self.claims.as_object_mut() {
            claims.remove(name);
        }
        self
    }

    pub fn header(mut self, name: &str, value: Value) -> Self {
        self.header[name] = value;
        self
    }

    pub fn without_header(mut self, name: &str) -> Self {
        if let Some(header) = self.header.as_object_mut() {
            header.remove(name);
        }
        self
    }

    /// Sign with `key`, naming it in `kid` and `x5t`
    pub fn signed_with(mut self, key: &'static TestKey) -> Self {
        self.header["kid"] = json!(key.kid);
        self.header["x5t"] = json!(key.kid);
        self.key = key;
        self
    }

    pub fn sign(self) -> String {
        let encoding: &'static dyn RsaEncoding =
            match self.header["alg"].as_str().unwrap_or("RS256") {
                "RS384" => &RSA_PKCS1_SHA384,
                "RS512" => &RSA_PKCS1_SHA512,
                _ => &RSA_PKCS1_SHA256,
            };

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(self.header.to_string()),
            URL_SAFE_NO_PAD.encode(self.claims.to_string())
        );
        let mut signature = vec![0u8; self.key.pair.public_modulus_len()];
        self.key
            .pair
            .sign(
                encoding,
                &SystemRandom::new(),
                signing_input.as_bytes(),
                &mut signature,
            )
            .unwrap();

        format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature))
    }
}

/// Change the first signature character so the signature no longer verifies
pub fn tamper_signature(token: &str) -> String {
    let (signing_input, signature) = token.rsplit_once('.').unwrap();
    let replacement = if signature.starts_with('A') { 'B' } else { 'A' };
    format!("{signing_input}.{replacement}{}", &signature[1..])
}

/// Configuration publishing only [`SIGNING_KEY`]
pub fn trusted_configuration() -> IssuerConfiguration {
    IssuerConfiguration::new(Some(TOKEN_ISSUER.into()), vec![SIGNING_KEY.signing_key()])
}

pub fn validator() -> TokenValidator {
    TokenValidator::new(Arc::new(StaticConfigurationProvider::new(
        trusted_configuration(),
    )))
}

/// Provider counting calls and failing every one of them
#[derive(Default)]
pub struct FailingProvider {
    pub calls: AtomicUsize,
}

impl FailingProvider {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigurationProvider for FailingProvider {
    async fn configuration(&self) -> actionable_token::Result<Arc<IssuerConfiguration>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::RemoteError("metadata endpoint unreachable".into()))
    }
}
