//! Auth service errors.

use sqlx::Error;
use thiserror::Error;

use crate::auth::{PasswordError, SessionTokenError};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("session not found")]
    NotFound,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("account is awaiting approval")]
    NotApproved,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error("password verification error")]
    Password(#[from] PasswordError),

    #[error("session token processing error")]
    Token(#[source] SessionTokenError),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}

impl From<SessionTokenError> for AuthServiceError {
    fn from(error: SessionTokenError) -> Self {
        Self::Token(error)
    }
}
