//! Deal Errors

use salvo::http::StatusError;
use tracing::error;

use loyalty_app::domain::deals::DealsServiceError;

pub(crate) fn into_status_error(error: DealsServiceError) -> StatusError {
    match error {
        DealsServiceError::AlreadyExists => StatusError::conflict().brief("Deal already exists"),
        DealsServiceError::NotFound => StatusError::not_found().brief("Deal not found"),
        DealsServiceError::InvalidReference
        | DealsServiceError::MissingRequiredData
        | DealsServiceError::InvalidData => StatusError::bad_request().brief("Invalid deal payload"),
        DealsServiceError::Forbidden => {
            StatusError::forbidden().brief("Not allowed to manage this deal")
        }
        DealsServiceError::InvalidTransition => {
            StatusError::unprocessable_entity().brief("Deal is no longer pending")
        }
        DealsServiceError::MissingPointsConfig => StatusError::unprocessable_entity()
            .brief("Deal owner's region has no points configuration"),
        DealsServiceError::Sql(source) => {
            error!("deals storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
