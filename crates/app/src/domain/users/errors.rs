//! Users service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::auth::{NotPermitted, PasswordError};

#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error("user already exists")]
    AlreadyExists,

    #[error("user not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("password does not meet requirements")]
    WeakPassword,

    #[error("actor is not allowed to manage this user")]
    Forbidden,

    #[error("user is not awaiting approval")]
    InvalidTransition,

    #[error("invite has expired")]
    InviteExpired,

    #[error("invite has already been used")]
    InviteUsed,

    #[error("password reset token is invalid or expired")]
    InvalidResetToken,

    #[error("region has no points configuration")]
    UnknownRegion,

    #[error("password hashing error")]
    Password(#[from] PasswordError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for UsersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}

impl From<NotPermitted> for UsersServiceError {
    fn from(_: NotPermitted) -> Self {
        Self::Forbidden
    }
}
