//! Salted argon2 hashes stored as PHC strings.

use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(password_hash::Error),
    #[error("stored hash is not a valid PHC string: {0}")]
    Malformed(password_hash::Error),
}

impl From<PasswordError> for crate::error::AppError {
    fn from(e: PasswordError) -> Self {
        crate::error::AppError::Internal(e.into())
    }
}

pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(PasswordError::Hash)
}

pub fn verify_password(plain: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(PasswordError::Malformed)?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Like [`verify_password`], but an unreadable stored hash is logged and
/// counts as a mismatch.
pub fn password_matches(plain: &str, stored: &str, account: &str) -> bool {
    verify_password(plain, stored).unwrap_or_else(|e| {
        error!(error = %e, account, "stored hash unreadable");
        false
    })
}
