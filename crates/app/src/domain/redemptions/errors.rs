//! Redemptions service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::auth::NotPermitted;

#[derive(Debug, Error)]
pub enum RedemptionsServiceError {
    #[error("redemption already exists")]
    AlreadyExists,

    #[error("redemption not found")]
    NotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("actor is not allowed to manage this redemption")]
    Forbidden,

    #[error("redemption cannot move from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("reward is not available")]
    RewardUnavailable,

    #[error("reward is out of stock")]
    OutOfStock,

    #[error("redemptions are closed for this region")]
    RedemptionClosed,

    #[error("insufficient points: {available} available, {required} required")]
    InsufficientPoints { available: i64, required: u64 },

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for RedemptionsServiceError {
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

impl From<NotPermitted> for RedemptionsServiceError {
    fn from(_: NotPermitted) -> Self {
        Self::Forbidden
    }
}
