//! Authentication service: login, token refresh and credential
//! management.

use escola_core::models::account::{Account, AccountId, CreateAccount, Role};
use escola_core::repository::AccountRepository;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::guard::authorize;
use crate::password;
use crate::token::{TokenService, TokenType};

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    /// Email or national id.
    pub identifier: String,
    pub password: String,
}

/// Access + refresh token pair returned by login and refresh.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Always `"bearer"`.
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

/// Input for admin-driven account registration.
#[derive(Debug)]
pub struct RegisterInput {
    pub email: String,
    pub national_id: Option<String>,
    pub full_name: String,
    pub role: Role,
    pub password: String,
}

/// Authentication service.
///
/// Generic over the account repository so that the auth layer has no
/// dependency on a concrete database.
pub struct AuthService<R: AccountRepository> {
    accounts: R,
    tokens: TokenService,
}

impl<R: AccountRepository> AuthService<R> {
    pub fn new(accounts: R, tokens: TokenService) -> Self {
        Self { accounts, tokens }
    }

    fn config(&self) -> &AuthConfig {
        self.tokens.config()
    }

    fn issue_pair(&self, account: &Account) -> AuthResult<TokenPair> {
        Ok(TokenPair {
            access_token: self
                .tokens
                .issue_access(account.id, &account.email, account.role)?,
            refresh_token: self.tokens.issue_refresh(account.id)?,
            token_type: "bearer",
            expires_in: self.tokens.access_token_lifetime_secs(),
        })
    }

    /// Authenticate with email or national id + password and issue
    /// tokens.
    pub async fn login(&self, input: LoginInput) -> AuthResult<TokenPair> {
        // 1. Look up account. Absent and wrong-password are
        //    indistinguishable to the caller.
        let Some(account) = self.accounts.find_by_credential(&input.identifier).await? else {
            warn!("login rejected: unknown credential");
            return Err(AuthError::InvalidCredentials);
        };

        // 2. Verify password.
        if !password::verify_password(&input.password, &account.password_hash) {
            warn!(account_id = account.id, "login rejected: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        // 3. Check account status.
        if !account.active {
            warn!(account_id = account.id, "login rejected: account inactive");
            return Err(AuthError::AccountInactive);
        }

        // 4. Issue tokens.
        let pair = self.issue_pair(&account)?;
        info!(account_id = account.id, role = %account.role, "login succeeded");
        Ok(pair)
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// The pair is built from the stored account, so a role change
    /// since the original login is reflected. The refresh token is
    /// rotated on every call.
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        let claims = self.tokens.decode(refresh_token).map_err(|e| {
            debug!(error = %e, "refresh token rejected");
            AuthError::Unauthorized
        })?;

        if claims.token_type != TokenType::Refresh {
            debug!("refresh attempted with a non-refresh token");
            return Err(AuthError::Unauthorized);
        }
        let account_id = claims.account_id().ok_or(AuthError::Unauthorized)?;

        let account = match self.accounts.find_by_id(account_id).await? {
            Some(account) if account.active => account,
            _ => {
                debug!(account_id, "refresh for missing or inactive account");
                return Err(AuthError::Unauthorized);
            }
        };

        let pair = self.issue_pair(&account)?;
        debug!(account_id, role = %account.role, "tokens refreshed");
        Ok(pair)
    }

    /// Change the caller's own password after re-verifying the current
    /// one.
    pub async fn change_password(
        &self,
        account: &Account,
        current_password: &str,
        new_password: &str,
    ) -> AuthResult<()> {
        if !password::verify_password(current_password, &account.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }
        self.store_password(account.id, new_password).await?;
        info!(account_id = account.id, "password changed");
        Ok(())
    }

    /// Set another account's password. Admin only.
    pub async fn reset_password(
        &self,
        actor: Account,
        target_id: AccountId,
        new_password: &str,
    ) -> AuthResult<()> {
        let actor = authorize(actor, &[Role::Admin])?;
        if self.accounts.find_by_id(target_id).await?.is_none() {
            return Err(AuthError::AccountNotFound);
        }
        self.store_password(target_id, new_password).await?;
        info!(actor_id = actor.id, account_id = target_id, "password reset by admin");
        Ok(())
    }

    /// Create an account on behalf of an administrator.
    pub async fn register(&self, actor: Account, input: RegisterInput) -> AuthResult<Account> {
        let actor = authorize(actor, &[Role::Admin])?;
        let account = self.create_account(input).await?;
        info!(
            actor_id = actor.id,
            account_id = account.id,
            role = %account.role,
            "account registered"
        );
        Ok(account)
    }

    /// Create the initial administrator. Intended for first-run setup,
    /// where no authenticated actor exists yet.
    pub async fn bootstrap_admin(
        &self,
        email: &str,
        full_name: &str,
        password: &str,
    ) -> AuthResult<Account> {
        let account = self
            .create_account(RegisterInput {
                email: email.to_owned(),
                national_id: None,
                full_name: full_name.to_owned(),
                role: Role::Admin,
                password: password.to_owned(),
            })
            .await?;
        info!(account_id = account.id, "bootstrap admin created");
        Ok(account)
    }

    async fn create_account(&self, input: RegisterInput) -> AuthResult<Account> {
        password::check_policy(&input.password, self.config().min_password_length)?;
        let password_hash = password::hash_password(&input.password, self.config().bcrypt_cost)?;
        let account = self
            .accounts
            .create(CreateAccount {
                email: input.email,
                national_id: input.national_id,
                full_name: input.full_name,
                password_hash,
                role: input.role,
            })
            .await?;
        Ok(account)
    }

    async fn store_password(&self, account_id: AccountId, new_password: &str) -> AuthResult<()> {
        password::check_policy(new_password, self.config().min_password_length)?;
        let hash = password::hash_password(new_password, self.config().bcrypt_cost)?;
        self.accounts.persist_new_hash(account_id, hash).await?;
        Ok(())
    }
}
