//! Signed Access Tokens
//!
//! HS256 JWTs carrying an application-defined claims payload plus the
//! registered `iat`/`exp` claims. Verification is all-or-nothing: bad
//! signature, tampered payload, wrong algorithm and expiry all collapse into
//! [`TokenError::Invalid`].

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Secret used when none is configured. Never acceptable in production.
pub const INSECURE_DEFAULT_SECRET: &str = "fallback-secret-key";

/// Default token lifetime (7 days)
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 3600);

// =============================================================================
// TokenConfig
// =============================================================================

#[derive(Clone)]
pub struct TokenConfig {
    /// HMAC secret
    pub secret: String,
    /// Lifetime of issued tokens
    pub expires_in: Duration,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: INSECURE_DEFAULT_SECRET.to_string(),
            expires_in: DEFAULT_TOKEN_TTL,
        }
    }
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    pub fn with_expiration(mut self, expires_in: Duration) -> Self {
        self.expires_in = expires_in;
        self
    }

    pub fn uses_insecure_default(&self) -> bool {
        self.secret == INSECURE_DEFAULT_SECRET
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

// =============================================================================
// Claims envelope
// =============================================================================

/// Application claims plus the registered time claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signed<C> {
    #[serde(flatten)]
    pub claims: C,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiry (Unix seconds)
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("Token is invalid or expired")]
    Invalid,
}

// =============================================================================
// TokenService
// =============================================================================

/// Issues and verifies access tokens. Cheap to clone.
#[derive(Clone)]
pub struct TokenService {
    config: Arc<TokenConfig>,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            config: Arc::new(config),
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
        }
    }

    /// Sign `claims`, valid from now for the configured lifetime
    pub fn issue<C: Serialize>(&self, claims: C) -> Result<String, TokenError> {
        self.issue_at(claims, Utc::now())
    }

    /// Sign `claims` as if issued at `issued_at`
    pub fn issue_at<C: Serialize>(
        &self,
        claims: C,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let iat = issued_at.timestamp();
        let ttl = i64::try_from(self.config.expires_in.as_secs()).unwrap_or(i64::MAX);
        let signed = Signed {
            claims,
            iat,
            exp: iat.saturating_add(ttl),
        };

        encode(&Header::new(Algorithm::HS256), &signed, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Check signature, algorithm and expiry, then decode
    pub fn verify<C: DeserializeOwned>(&self, token: &str) -> Result<Signed<C>, TokenError> {
        decode::<Signed<C>>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(reason = ?e.kind(), "Token rejected");
                TokenError::Invalid
            })
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &Algorithm::HS256)
            .field("expires_in", &self.config.expires_in)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct TestClaims {
        user_id: String,
        role: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cooperative_id: Option<String>,
    }

    fn claims() -> TestClaims {
        TestClaims {
            user_id: "u-1".to_string(),
            role: "FARMER".to_string(),
            cooperative_id: Some("c-9".to_string()),
        }
    }

    fn service(secret: &str) -> TokenService {
        TokenService::new(TokenConfig::new(secret))
    }

    #[test]
    fn test_issue_then_verify_round_trips() {
        let tokens = service("a-test-secret-that-is-long-enough");
        let token = tokens.issue(claims()).unwrap();

        let verified: Signed<TestClaims> = tokens.verify(&token).unwrap();
        assert_eq!(verified.claims, claims());
        assert_eq!(verified.exp - verified.iat, DEFAULT_TOKEN_TTL.as_secs() as i64);
    }

    #[test]
    fn test_payload_uses_flat_camel_case_fields() {
        use base64::Engine;

        let tokens = service("secret");
        let token = tokens.issue(claims()).unwrap();
        let payload = token.split('.').nth(1).unwrap();
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(payload)
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["userId"], "u-1");
        assert_eq!(json["cooperativeId"], "c-9");
        assert!(json["exp"].is_i64());
    }

    #[test]
    fn test_expired_token_is_invalid() {
        let tokens = service("secret");
        let eight_days_ago = Utc::now() - chrono::Duration::days(8);
        let token = tokens.issue_at(claims(), eight_days_ago).unwrap();

        assert!(matches!(
            tokens.verify::<TestClaims>(&token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_token_from_other_secret_is_invalid() {
        let token = service("secret-one").issue(claims()).unwrap();

        assert!(matches!(
            service("secret-two").verify::<TestClaims>(&token),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_tampered_payload_is_invalid() {
        let tokens = service("secret");
        let token = tokens.issue(claims()).unwrap();
        let forged = tokens
            .issue(TestClaims {
                role: "ADMIN".to_string(),
                ..claims()
            })
            .unwrap();

        // Original header and signature around a different payload
        let parts: Vec<&str> = token.split('.').collect();
        let forged_payload = forged.split('.').nth(1).unwrap();
        let spliced = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert!(tokens.verify::<TestClaims>(&spliced).is_err());
    }

    #[test]
    fn test_other_algorithm_is_invalid() {
        let now = Utc::now().timestamp();
        let signed = Signed {
            claims: claims(),
            iat: now,
            exp: now + 600,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &signed,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(service("secret").verify::<TestClaims>(&token).is_err());
    }

    #[test]
    fn test_garbage_is_invalid() {
        let tokens = service("secret");
        assert!(tokens.verify::<TestClaims>("").is_err());
        assert!(tokens.verify::<TestClaims>("abc").is_err());
        assert!(tokens.verify::<TestClaims>("a.b.c").is_err());
    }

    #[test]
    fn test_custom_expiration() {
        let tokens = TokenService::new(
            TokenConfig::new("secret").with_expiration(Duration::from_secs(3600)),
        );
        let token = tokens.issue(claims()).unwrap();
        let verified: Signed<TestClaims> = tokens.verify(&token).unwrap();
        assert_eq!(verified.exp - verified.iat, 3600);
    }

    #[test]
    fn test_insecure_default_is_detectable() {
        assert!(TokenConfig::default().uses_insecure_default());
        assert!(!TokenConfig::new("real-secret").uses_insecure_default());
        assert!(!format!("{:?}", TokenConfig::new("real-secret")).contains("real-secret"));
    }
}
