//! Password hashing.

use std::fmt;

use argon2::{
    Argon2,
    password_hash::{
        Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use thiserror::Error;
use zeroize::Zeroize;

/// Shortest password accepted at registration or reset.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A password as typed by the user. Never printed, wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct PlainPassword(String);

impl PlainPassword {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Reject passwords below the minimum length.
    pub fn validate(&self) -> Result<(), PasswordError> {
        if self.0.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::TooShort);
        }

        Ok(())
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainPassword(**redacted**)")
    }
}

impl From<String> for PlainPassword {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Drop for PlainPassword {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooShort,

    #[error("password hash is malformed")]
    MalformedHash,

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Hash a password into a PHC string using Argon2id with a random salt.
pub fn hash_password(password: &PlainPassword) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.expose().as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Check a password against a stored PHC string.
pub fn verify_password(password: &PlainPassword, stored: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(|_| PasswordError::MalformedHash)?;

    match Argon2::default().verify_password(password.expose().as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(PasswordError::Hash(e.to_string())),
    }
}
