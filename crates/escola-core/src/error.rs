//! Error types for the Escola system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EscolaError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity}")]
    AlreadyExists { entity: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Authorization denied: {reason}")]
    AuthorizationDenied { reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),
}

impl EscolaError {
    pub fn account_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity: "account".into(),
            id: id.to_string(),
        }
    }
}

pub type EscolaResult<T> = Result<T, EscolaError>;
