//! Authentication configuration.

use jsonwebtoken::Algorithm;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{AuthError, AuthResult};

/// Lowest and highest work factors accepted by bcrypt.
pub const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Longest token lifetime accepted for either token type (365 days).
pub const MAX_TOKEN_LIFETIME_SECS: u64 = 365 * 24 * 60 * 60;

/// Configuration for the authentication core.
///
/// Built once at startup and shared read-only by every request.
#[derive(Debug)]
pub struct AuthConfig {
    /// Shared HMAC secret used to both sign and verify tokens.
    pub jwt_secret: SecretString,
    /// Signing algorithm. Always a symmetric HMAC variant.
    pub jwt_algorithm: Algorithm,
    /// Access token lifetime in seconds (default: 1800 = 30 minutes).
    pub access_token_lifetime_secs: u64,
    /// Refresh token lifetime in seconds (default: 14_400 = 4 hours).
    pub refresh_token_lifetime_secs: u64,
    /// bcrypt work factor used when hashing new credentials.
    pub bcrypt_cost: u32,
    /// Minimum password length for policy enforcement.
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: SecretString::from(String::new()),
            jwt_algorithm: Algorithm::HS256,
            access_token_lifetime_secs: 1800,
            refresh_token_lifetime_secs: 14_400,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            min_password_length: 6,
        }
    }
}

impl Clone for AuthConfig {
    fn clone(&self) -> Self {
        Self {
            jwt_secret: SecretString::from(self.jwt_secret.expose_secret().to_owned()),
            jwt_algorithm: self.jwt_algorithm,
            access_token_lifetime_secs: self.access_token_lifetime_secs,
            refresh_token_lifetime_secs: self.refresh_token_lifetime_secs,
            bcrypt_cost: self.bcrypt_cost,
            min_password_length: self.min_password_length,
        }
    }
}

impl AuthConfig {
    /// Creates a configuration with the given signing secret and
    /// default lifetimes.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: SecretString::from(secret.into()),
            ..Default::default()
        }
    }

    pub fn with_access_token_lifetime_secs(mut self, secs: u64) -> Self {
        self.access_token_lifetime_secs = secs;
        self
    }

    pub fn with_refresh_token_lifetime_secs(mut self, secs: u64) -> Self {
        self.refresh_token_lifetime_secs = secs;
        self
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn with_min_password_length(mut self, len: usize) -> Self {
        self.min_password_length = len;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AuthResult<()> {
        let secret_len = self.jwt_secret.expose_secret().len();
        if secret_len == 0 {
            return Err(AuthError::Crypto("JWT secret is not configured".into()));
        }
        if secret_len < 32 {
            tracing::warn!("JWT secret is shorter than recommended (32 bytes)");
        }
        if !matches!(
            self.jwt_algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(AuthError::Crypto(format!(
                "unsupported signing algorithm {:?}: only HMAC is allowed",
                self.jwt_algorithm
            )));
        }
        for (name, secs) in [
            ("access", self.access_token_lifetime_secs),
            ("refresh", self.refresh_token_lifetime_secs),
        ] {
            if secs == 0 || secs > MAX_TOKEN_LIFETIME_SECS {
                return Err(AuthError::Crypto(format!(
                    "{name} token lifetime {secs}s outside 1..={MAX_TOKEN_LIFETIME_SECS}"
                )));
            }
        }
        if !BCRYPT_COST_RANGE.contains(&self.bcrypt_cost) {
            return Err(AuthError::Crypto(format!(
                "bcrypt cost {} outside {}..={}",
                self.bcrypt_cost,
                BCRYPT_COST_RANGE.start(),
                BCRYPT_COST_RANGE.end()
            )));
        }
        Ok(())
    }
}
