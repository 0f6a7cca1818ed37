//! Authentication error types.

use escola_core::error::EscolaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is inactive")]
    AccountInactive,

    #[error("account not found")]
    AccountNotFound,

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("wrong token type")]
    InvalidTokenType,

    #[error("could not validate credentials")]
    Unauthorized,

    #[error("insufficient role")]
    Forbidden,

    #[error("password rejected: {0}")]
    WeakPassword(String),

    #[error("cryptography error: {0}")]
    Crypto(String),

    /// Display stays generic; the storage detail is only reachable
    /// through `source()`.
    #[error("storage failure")]
    Repository(#[from] EscolaError),
}

/// Payload-free discriminant of [`AuthError`], for boundary layers
/// that map failures onto transport status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthErrorKind {
    InvalidCredentials,
    AccountInactive,
    AccountNotFound,
    TokenExpired,
    TokenInvalid,
    InvalidTokenType,
    Unauthorized,
    Forbidden,
    WeakPassword,
    Crypto,
    Repository,
}

impl AuthError {
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            AuthError::InvalidCredentials => AuthErrorKind::InvalidCredentials,
            AuthError::AccountInactive => AuthErrorKind::AccountInactive,
            AuthError::AccountNotFound => AuthErrorKind::AccountNotFound,
            AuthError::TokenExpired => AuthErrorKind::TokenExpired,
            AuthError::TokenInvalid(_) => AuthErrorKind::TokenInvalid,
            AuthError::InvalidTokenType => AuthErrorKind::InvalidTokenType,
            AuthError::Unauthorized => AuthErrorKind::Unauthorized,
            AuthError::Forbidden => AuthErrorKind::Forbidden,
            AuthError::WeakPassword(_) => AuthErrorKind::WeakPassword,
            AuthError::Crypto(_) => AuthErrorKind::Crypto,
            AuthError::Repository(_) => AuthErrorKind::Repository,
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

impl From<AuthError> for EscolaError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::AccountInactive
            | AuthError::AccountNotFound
            | AuthError::TokenExpired
            | AuthError::TokenInvalid(_)
            | AuthError::InvalidTokenType
            | AuthError::Unauthorized => EscolaError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::Forbidden => EscolaError::AuthorizationDenied {
                reason: err.to_string(),
            },
            AuthError::WeakPassword(message) => EscolaError::Validation { message },
            AuthError::Crypto(msg) => EscolaError::Crypto(msg),
            AuthError::Repository(inner) => inner,
        }
    }
}
