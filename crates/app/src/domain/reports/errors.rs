//! Reports service errors.

use sqlx::Error;
use thiserror::Error;

use crate::auth::NotPermitted;

#[derive(Debug, Error)]
pub enum ReportsServiceError {
    #[error("actor is not allowed to read reports")]
    Forbidden,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for ReportsServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}

impl From<NotPermitted> for ReportsServiceError {
    fn from(_: NotPermitted) -> Self {
        Self::Forbidden
    }
}
