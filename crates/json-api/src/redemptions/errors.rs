//! Redemption Errors

use salvo::http::StatusError;
use tracing::error;

use loyalty_app::domain::redemptions::RedemptionsServiceError;

pub(crate) fn into_status_error(error: RedemptionsServiceError) -> StatusError {
    match error {
        RedemptionsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Redemption already exists")
        }
        RedemptionsServiceError::NotFound => {
            StatusError::not_found().brief("Redemption not found")
        }
        RedemptionsServiceError::InvalidReference
        | RedemptionsServiceError::MissingRequiredData
        | RedemptionsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid redemption payload")
        }
        RedemptionsServiceError::Forbidden => {
            StatusError::forbidden().brief("Not allowed to manage this redemption")
        }
        RedemptionsServiceError::InvalidTransition { from, to } => {
            StatusError::unprocessable_entity()
                .brief(format!("Redemption cannot move from {from} to {to}"))
        }
        RedemptionsServiceError::RewardUnavailable => {
            StatusError::unprocessable_entity().brief("Reward is not available")
        }
        RedemptionsServiceError::OutOfStock => {
            StatusError::unprocessable_entity().brief("Reward is out of stock")
        }
        RedemptionsServiceError::RedemptionClosed => {
            StatusError::unprocessable_entity().brief("Redemptions are closed for your region")
        }
        RedemptionsServiceError::InsufficientPoints {
            available,
            required,
        } => StatusError::unprocessable_entity().brief(format!(
            "Insufficient points: {available} available, {required} required"
        )),
        RedemptionsServiceError::Sql(source) => {
            error!("redemptions storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
