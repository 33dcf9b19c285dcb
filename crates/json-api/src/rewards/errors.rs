//! Reward Errors

use salvo::http::StatusError;
use tracing::error;

use loyalty_app::domain::rewards::RewardsServiceError;

pub(crate) fn into_status_error(error: RewardsServiceError) -> StatusError {
    match error {
        RewardsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Reward already exists")
        }
        RewardsServiceError::NotFound => StatusError::not_found().brief("Reward not found"),
        RewardsServiceError::InvalidReference
        | RewardsServiceError::MissingRequiredData
        | RewardsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid reward payload")
        }
        RewardsServiceError::Forbidden => {
            StatusError::forbidden().brief("Not allowed to manage rewards")
        }
        RewardsServiceError::Sql(source) => {
            error!("rewards storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
