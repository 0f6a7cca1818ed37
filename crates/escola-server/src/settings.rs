//! Environment-based settings.
//!
//! Durations are read in the unit named by each key and converted to
//! seconds only in [`Settings::auth_config`].

use anyhow::{Context, bail};
use escola_auth::AuthConfig;
use secrecy::{ExposeSecret, SecretString};

pub const SECRET_KEY: &str = "ESCOLA_SECRET_KEY";
pub const ACCESS_TOKEN_EXPIRE_MINUTES: &str = "ESCOLA_ACCESS_TOKEN_EXPIRE_MINUTES";
pub const REFRESH_TOKEN_EXPIRE_HOURS: &str = "ESCOLA_REFRESH_TOKEN_EXPIRE_HOURS";
pub const BCRYPT_COST: &str = "ESCOLA_BCRYPT_COST";
pub const MIN_PASSWORD_LENGTH: &str = "ESCOLA_MIN_PASSWORD_LENGTH";

#[derive(Debug)]
pub struct Settings {
    /// Token signing secret. Only commands that touch tokens need it.
    pub secret_key: Option<SecretString>,
    pub access_token_expire_minutes: u64,
    pub refresh_token_expire_hours: u64,
    pub bcrypt_cost: u32,
    pub min_password_length: usize,
}

impl Settings {
    /// Load from the process environment, after applying `.env` if one
    /// is present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            secret_key: lookup(SECRET_KEY)
                .filter(|s| !s.is_empty())
                .map(SecretString::from),
            access_token_expire_minutes: parse_or(&lookup, ACCESS_TOKEN_EXPIRE_MINUTES, 30)?,
            refresh_token_expire_hours: parse_or(&lookup, REFRESH_TOKEN_EXPIRE_HOURS, 4)?,
            bcrypt_cost: parse_or(&lookup, BCRYPT_COST, 12)?,
            min_password_length: parse_or(&lookup, MIN_PASSWORD_LENGTH, 6)?,
        })
    }

    /// Build and validate the auth configuration.
    pub fn auth_config(&self) -> anyhow::Result<AuthConfig> {
        let Some(secret) = &self.secret_key else {
            bail!("{SECRET_KEY} is not set");
        };
        let access_secs = self
            .access_token_expire_minutes
            .checked_mul(60)
            .with_context(|| format!("{ACCESS_TOKEN_EXPIRE_MINUTES} is out of range"))?;
        let refresh_secs = self
            .refresh_token_expire_hours
            .checked_mul(60 * 60)
            .with_context(|| format!("{REFRESH_TOKEN_EXPIRE_HOURS} is out of range"))?;
        let config = AuthConfig::new(secret.expose_secret())
            .with_access_token_lifetime_secs(access_secs)
            .with_refresh_token_lifetime_secs(refresh_secs)
            .with_bcrypt_cost(self.bcrypt_cost)
            .with_min_password_length(self.min_password_length);
        config.validate()?;
        Ok(config)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value")),
        None => Ok(default),
    }
}
