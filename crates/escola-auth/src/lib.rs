//! Escola Auth: bcrypt credential hashing, JWT access/refresh token
//! issuance and validation, and role-gated request authorization.

pub mod config;
pub mod error;
pub mod guard;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::{AuthError, AuthErrorKind, AuthResult};
pub use guard::{AuthGuard, TokenInfo, authorize, bearer_token};
pub use service::{AuthService, LoginInput, RegisterInput, TokenPair};
pub use token::{TokenClaims, TokenService, TokenType};
