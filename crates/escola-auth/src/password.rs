//! Password hashing and verification using bcrypt.
//!
//! bcrypt only consumes the first 72 bytes of its input. Both
//! [`hash_password`] and [`verify_password`] truncate explicitly at
//! that bound, so a longer secret and its 72-byte prefix hash and
//! verify interchangeably.

use crate::error::{AuthError, AuthResult};

/// Input bound of the bcrypt primitive, in UTF-8 bytes.
pub const MAX_SECRET_BYTES: usize = 72;

/// Returns the bytes of `secret` that bcrypt will see.
///
/// The cut is on bytes, not characters, and may split a multi-byte
/// code point.
pub fn truncate_secret(secret: &str) -> &[u8] {
    let bytes = secret.as_bytes();
    &bytes[..bytes.len().min(MAX_SECRET_BYTES)]
}

/// Hash a plaintext secret with a fresh random salt.
pub fn hash_password(secret: &str, cost: u32) -> AuthResult<String> {
    bcrypt::hash(truncate_secret(secret), cost)
        .map_err(|e| AuthError::Crypto(format!("password hash error: {e}")))
}

/// Verify a plaintext secret against a stored bcrypt hash.
///
/// A malformed or unsupported hash is a mismatch, not an error.
pub fn verify_password(secret: &str, hash: &str) -> bool {
    match bcrypt::verify(truncate_secret(secret), hash) {
        Ok(matched) => matched,
        Err(e) => {
            tracing::debug!(error = %e, "stored credential hash could not be parsed");
            false
        }
    }
}

/// Check a new password against the account password policy: at
/// least `min_len` characters with at least one letter and one digit.
pub fn check_policy(secret: &str, min_len: usize) -> AuthResult<()> {
    if secret.chars().count() < min_len {
        return Err(AuthError::WeakPassword(format!(
            "must be at least {min_len} characters"
        )));
    }
    if !secret.chars().any(char::is_alphabetic) {
        return Err(AuthError::WeakPassword("must contain a letter".into()));
    }
    if !secret.chars().any(|c| c.is_ascii_digit()) {
        return Err(AuthError::WeakPassword("must contain a digit".into()));
    }
    Ok(())
}
