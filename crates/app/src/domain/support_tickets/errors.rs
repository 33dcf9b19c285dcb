//! Support ticket service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::auth::NotPermitted;

#[derive(Debug, Error)]
pub enum SupportTicketsServiceError {
    #[error("ticket already exists")]
    AlreadyExists,

    #[error("ticket not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("actor is not allowed to manage support tickets")]
    Forbidden,

    #[error("ticket cannot move from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for SupportTicketsServiceError {
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

impl From<NotPermitted> for SupportTicketsServiceError {
    fn from(_: NotPermitted) -> Self {
        Self::Forbidden
    }
}
