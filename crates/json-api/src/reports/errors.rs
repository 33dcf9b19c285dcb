//! Report Errors

use salvo::http::StatusError;
use tracing::error;

use loyalty_app::domain::reports::ReportsServiceError;

pub(crate) fn into_status_error(error: ReportsServiceError) -> StatusError {
    match error {
        ReportsServiceError::Forbidden => {
            StatusError::forbidden().brief("Reports are restricted to super admins")
        }
        ReportsServiceError::Sql(source) => {
            error!("reports storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
