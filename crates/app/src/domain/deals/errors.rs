//! Deals service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::auth::NotPermitted;

#[derive(Debug, Error)]
pub enum DealsServiceError {
    #[error("deal already exists")]
    AlreadyExists,

    #[error("deal not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("actor is not allowed to access this deal")]
    Forbidden,

    #[error("deal is no longer pending")]
    InvalidTransition,

    #[error("deal owner's region has no points configuration")]
    MissingPointsConfig,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for DealsServiceError {
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

impl From<NotPermitted> for DealsServiceError {
    fn from(_: NotPermitted) -> Self {
        Self::Forbidden
    }
}
