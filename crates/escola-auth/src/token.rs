//! JWT access/refresh token issuance and verification.
//!
//! Tokens are compact HMAC-signed JWS strings. Both token types share
//! one claim set; only access tokens carry the `email`/`role` display
//! claims.

use std::sync::Arc;

use chrono::Utc;
use escola_core::models::account::{AccountId, Role};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};

// =============================================================================
// Claims
// =============================================================================

/// Token purpose. Travels in the `type` claim as `"access"` or `"refresh"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims signed into every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: account id as a decimal string. Empty when absent.
    #[serde(default)]
    pub sub: String,
    /// Issued-at (Unix seconds).
    pub iat: i64,
    /// Expiration (Unix seconds).
    pub exp: i64,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl TokenClaims {
    /// Parses the subject back into an account id.
    pub fn account_id(&self) -> Option<AccountId> {
        self.sub.parse().ok()
    }
}

fn now() -> i64 {
    Utc::now().timestamp()
}

/// `iat + lifetime`, failing instead of wrapping.
fn expiry(iat: i64, lifetime_secs: u64) -> AuthResult<i64> {
    i64::try_from(lifetime_secs)
        .ok()
        .and_then(|secs| iat.checked_add(secs))
        .ok_or_else(|| AuthError::Crypto(format!("token lifetime {lifetime_secs}s overflows expiry")))
}

// =============================================================================
// TokenService
// =============================================================================

/// Central component for minting and parsing tokens.
///
/// Holds the signing secret and algorithm for the life of the process;
/// cheap to clone.
#[derive(Clone)]
pub struct TokenService {
    config: Arc<AuthConfig>,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl TokenService {
    pub fn new(config: AuthConfig) -> AuthResult<Self> {
        config.validate()?;

        let secret = config.jwt_secret.expose_secret().as_bytes();
        let encoding_key = EncodingKey::from_secret(secret);
        let decoding_key = DecodingKey::from_secret(secret);

        let mut validation = Validation::new(config.jwt_algorithm);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            config: Arc::new(config),
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Signs arbitrary claims.
    pub fn sign(&self, claims: &TokenClaims) -> AuthResult<String> {
        let header = Header::new(self.config.jwt_algorithm);
        jsonwebtoken::encode(&header, claims, &self.encoding_key)
            .map_err(|e| AuthError::Crypto(format!("JWT encode: {e}")))
    }

    /// Issue a short-lived access token carrying the display claims.
    pub fn issue_access(&self, account_id: AccountId, email: &str, role: Role) -> AuthResult<String> {
        let iat = now();
        self.sign(&TokenClaims {
            sub: account_id.to_string(),
            iat,
            exp: expiry(iat, self.config.access_token_lifetime_secs)?,
            token_type: TokenType::Access,
            email: Some(email.to_owned()),
            role: Some(role),
        })
    }

    /// Issue a refresh token carrying identity only.
    pub fn issue_refresh(&self, account_id: AccountId) -> AuthResult<String> {
        let iat = now();
        self.sign(&TokenClaims {
            sub: account_id.to_string(),
            iat,
            exp: expiry(iat, self.config.refresh_token_lifetime_secs)?,
            token_type: TokenType::Refresh,
            email: None,
            role: None,
        })
    }

    /// Verify signature and expiry, returning the claims.
    ///
    /// Expired means `now >= exp`. Signature and structure are checked
    /// first, so a tampered token is `TokenInvalid` even if expired.
    pub fn decode(&self, token: &str) -> AuthResult<TokenClaims> {
        let claims = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid(e.to_string()),
            })?;

        if now() >= claims.exp {
            return Err(AuthError::TokenExpired);
        }
        Ok(claims)
    }

    /// Access token lifetime in seconds, for `expires_in` responses.
    pub fn access_token_lifetime_secs(&self) -> u64 {
        self.config.access_token_lifetime_secs
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.config.jwt_algorithm)
            .field("access_token_lifetime_secs", &self.config.access_token_lifetime_secs)
            .field("refresh_token_lifetime_secs", &self.config.refresh_token_lifetime_secs)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-that-is-long-enough-for-testing";

    fn service() -> TokenService {
        TokenService::new(AuthConfig::new(SECRET).with_bcrypt_cost(4)).unwrap()
    }

    fn flip_char_at(token: &str, index: usize) -> String {
        let mut chars: Vec<char> = token.chars().collect();
        chars[index] = if chars[index] == 'A' { 'g' } else { 'A' };
        chars.into_iter().collect()
    }

    #[test]
    fn access_token_roundtrip() {
        let svc = service();
        let token = svc.issue_access(1, "a@b.com", Role::Admin).unwrap();
        let claims = svc.decode(&token).unwrap();

        assert_eq!(claims.sub, "1");
        assert_eq!(claims.account_id(), Some(1));
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.email.as_deref(), Some("a@b.com"));
        assert_eq!(claims.role, Some(Role::Admin));
        assert_eq!(claims.exp - claims.iat, 1800);
    }

    #[test]
    fn refresh_token_carries_identity_only() {
        let svc = service();
        let token = svc.issue_refresh(9).unwrap();
        let claims = svc.decode(&token).unwrap();

        assert_eq!(claims.sub, "9");
        assert_eq!(claims.token_type, TokenType::Refresh);
        assert!(claims.email.is_none());
        assert!(claims.role.is_none());
        assert_eq!(claims.exp - claims.iat, 14_400);
    }

    #[test]
    fn past_expiry_is_expired() {
        let svc = service();
        let past = now() - 3600;
        let token = svc
            .sign(&TokenClaims {
                sub: "1".into(),
                iat: past - 60,
                exp: past,
                token_type: TokenType::Access,
                email: None,
                role: None,
            })
            .unwrap();

        assert!(matches!(svc.decode(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let svc = service();
        let iat = now();
        let token = svc
            .sign(&TokenClaims {
                sub: "1".into(),
                iat,
                exp: iat,
                token_type: TokenType::Access,
                email: None,
                role: None,
            })
            .unwrap();

        assert!(matches!(svc.decode(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn expiry_overflow_is_an_error() {
        assert!(matches!(expiry(i64::MAX - 10, 60), Err(AuthError::Crypto(_))));
        assert!(matches!(expiry(0, u64::MAX), Err(AuthError::Crypto(_))));
        assert_eq!(expiry(100, 1800).unwrap(), 1900);
    }

    #[test]
    fn longest_lifetime_issues_a_live_token() {
        let svc = TokenService::new(
            AuthConfig::new(SECRET)
                .with_access_token_lifetime_secs(crate::config::MAX_TOKEN_LIFETIME_SECS),
        )
        .unwrap();
        let token = svc.issue_access(1, "a@b.com", Role::Student).unwrap();

        assert!(svc.decode(&token).is_ok());
    }

    #[test]
    fn tampered_signature_is_invalid() {
        let svc = service();
        let token = svc.issue_access(1, "a@b.com", Role::Admin).unwrap();
        let signature_start = token.rfind('.').unwrap() + 1;

        for index in signature_start..token.len() {
            let tampered = flip_char_at(&token, index);
            assert!(
                matches!(svc.decode(&tampered), Err(AuthError::TokenInvalid(_))),
                "byte {index} flip was not rejected"
            );
        }
    }

    #[test]
    fn tampered_payload_is_invalid() {
        let svc = service();
        let token = svc.issue_access(1, "a@b.com", Role::Student).unwrap();
        let payload_start = token.find('.').unwrap() + 1;

        let tampered = flip_char_at(&token, payload_start + 4);
        assert!(matches!(svc.decode(&tampered), Err(AuthError::TokenInvalid(_))));
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let other = TokenService::new(AuthConfig::new("another-secret-that-is-long-enough!!")).unwrap();
        let token = other.issue_access(1, "a@b.com", Role::Admin).unwrap();

        assert!(matches!(service().decode(&token), Err(AuthError::TokenInvalid(_))));
    }

    #[test]
    fn garbage_is_invalid() {
        let svc = service();
        for input in ["", "invalid.token.here", "a.b", "not a jwt at all"] {
            assert!(
                matches!(svc.decode(input), Err(AuthError::TokenInvalid(_))),
                "{input:?} was not rejected"
            );
        }
    }

    #[test]
    fn missing_type_claim_is_invalid() {
        let token = jsonwebtoken::encode(
            &Header::default(),
            &serde_json::json!({ "sub": "1", "iat": now(), "exp": now() + 600 }),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(service().decode(&token), Err(AuthError::TokenInvalid(_))));
    }

    #[test]
    fn missing_subject_decodes_to_empty() {
        let token = jsonwebtoken::encode(
            &Header::default(),
            &serde_json::json!({ "iat": now(), "exp": now() + 600, "type": "access" }),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let claims = service().decode(&token).unwrap();
        assert!(claims.sub.is_empty());
        assert_eq!(claims.account_id(), None);
    }

    #[test]
    fn wire_format_uses_lowercase_type() {
        let svc = service();
        let token = svc.issue_refresh(3).unwrap();
        let mut validation = Validation::default();
        validation.validate_aud = false;
        let raw = jsonwebtoken::decode::<serde_json::Value>(
            &token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &validation,
        )
        .unwrap();

        assert_eq!(raw.claims["type"], "refresh");
        assert_eq!(raw.claims["sub"], "3");
        assert!(raw.claims.get("email").is_none());
    }

    #[test]
    fn debug_hides_secret() {
        let rendered = format!("{:?}", service());
        assert!(!rendered.contains(SECRET));
    }
}
