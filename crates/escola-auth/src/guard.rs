//! Request authentication and role-based authorization.
//!
//! The guard trusts a token only for identity. Role and active flag
//! are always re-read from the repository, since either may have
//! changed after the token was issued.

use chrono::{DateTime, Utc};
use escola_core::models::account::{Account, AccountId, Role};
use escola_core::repository::AccountRepository;
use serde::Serialize;
use tracing::debug;

use crate::error::{AuthError, AuthResult};
use crate::token::{TokenClaims, TokenService, TokenType};

/// Extract the token from an `Authorization` header value.
///
/// The `Bearer` scheme is matched case-insensitively.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Pass `account` through if its role is one of `allowed`.
pub fn authorize(account: Account, allowed: &[Role]) -> AuthResult<Account> {
    if allowed.contains(&account.role) {
        Ok(account)
    } else {
        debug!(account_id = account.id, role = %account.role, "role not permitted");
        Err(AuthError::Forbidden)
    }
}

/// Identity details for an authenticated token.
#[derive(Debug, Clone, Serialize)]
pub struct TokenInfo {
    pub account_id: AccountId,
    pub email: String,
    pub national_id: Option<String>,
    pub role: Role,
    pub issued_at: Option<DateTime<Utc>>,
}

/// Gate for protected operations.
pub struct AuthGuard<R: AccountRepository> {
    accounts: R,
    tokens: TokenService,
}

impl<R: AccountRepository> AuthGuard<R> {
    pub fn new(accounts: R, tokens: TokenService) -> Self {
        Self { accounts, tokens }
    }

    /// Resolve an access token to the live, active account it names.
    pub async fn authenticate(&self, token: &str) -> AuthResult<Account> {
        let claims = self.tokens.decode(token)?;
        self.account_for(&claims).await
    }

    /// [`authenticate`](Self::authenticate) from a raw `Authorization`
    /// header value.
    pub async fn authenticate_header(&self, header_value: &str) -> AuthResult<Account> {
        let token = bearer_token(header_value).ok_or(AuthError::Unauthorized)?;
        self.authenticate(token).await
    }

    /// Authenticate, then require one of `allowed` roles.
    pub async fn require(&self, token: &str, allowed: &[Role]) -> AuthResult<Account> {
        let account = self.authenticate(token).await?;
        authorize(account, allowed)
    }

    pub async fn require_admin(&self, token: &str) -> AuthResult<Account> {
        self.require(token, &[Role::Admin]).await
    }

    pub async fn token_info(&self, token: &str) -> AuthResult<TokenInfo> {
        let claims = self.tokens.decode(token)?;
        let account = self.account_for(&claims).await?;
        Ok(TokenInfo {
            account_id: account.id,
            email: account.email,
            national_id: account.national_id,
            role: account.role,
            issued_at: DateTime::from_timestamp(claims.iat, 0),
        })
    }

    async fn account_for(&self, claims: &TokenClaims) -> AuthResult<Account> {
        if claims.token_type != TokenType::Access {
            return Err(AuthError::InvalidTokenType);
        }
        let account_id = claims.account_id().ok_or(AuthError::Unauthorized)?;

        let account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !account.active {
            debug!(account_id, "inactive account presented a token");
            return Err(AuthError::AccountInactive);
        }
        Ok(account)
    }
}
