//! Points Config Errors

use salvo::http::StatusError;
use tracing::error;

use loyalty_app::domain::points_config::PointsConfigServiceError;

pub(crate) fn into_status_error(error: PointsConfigServiceError) -> StatusError {
    match error {
        PointsConfigServiceError::AlreadyExists => {
            StatusError::conflict().brief("Points configuration already exists")
        }
        PointsConfigServiceError::NotFound => {
            StatusError::not_found().brief("No points configuration for this region")
        }
        PointsConfigServiceError::InvalidReference
        | PointsConfigServiceError::MissingRequiredData
        | PointsConfigServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid points configuration")
        }
        PointsConfigServiceError::Forbidden => {
            StatusError::forbidden().brief("Not allowed to manage this region")
        }
        PointsConfigServiceError::Sql(source) => {
            error!("points config storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
