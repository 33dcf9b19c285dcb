//! Points Errors

use salvo::http::StatusError;
use tracing::error;

use loyalty_app::domain::points::PointsServiceError;

pub(crate) fn into_status_error(error: PointsServiceError) -> StatusError {
    match error {
        PointsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Points entry already exists")
        }
        PointsServiceError::NotFound => StatusError::not_found().brief("User not found"),
        PointsServiceError::InvalidReference
        | PointsServiceError::MissingRequiredData
        | PointsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid points adjustment")
        }
        PointsServiceError::Forbidden => {
            StatusError::forbidden().brief("Not allowed to adjust points")
        }
        PointsServiceError::InsufficientPoints => StatusError::unprocessable_entity()
            .brief("Adjustment would make the balance negative"),
        PointsServiceError::Sql(source) => {
            error!("points storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
