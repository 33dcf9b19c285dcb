//! User Errors

use salvo::http::StatusError;
use tracing::error;

use loyalty_app::domain::users::UsersServiceError;

pub(crate) fn into_status_error(error: UsersServiceError) -> StatusError {
    match error {
        UsersServiceError::AlreadyExists => {
            StatusError::conflict().brief("Email or username already registered")
        }
        UsersServiceError::NotFound => StatusError::not_found().brief("User not found"),
        UsersServiceError::InvalidReference
        | UsersServiceError::MissingRequiredData
        | UsersServiceError::InvalidData => StatusError::bad_request().brief("Invalid user payload"),
        UsersServiceError::WeakPassword => {
            StatusError::bad_request().brief("Password does not meet requirements")
        }
        UsersServiceError::InvalidResetToken => {
            StatusError::bad_request().brief("Invalid or expired reset token")
        }
        UsersServiceError::Forbidden => {
            StatusError::forbidden().brief("Not allowed to manage this user")
        }
        UsersServiceError::InvalidTransition => {
            StatusError::unprocessable_entity().brief("User is not awaiting approval")
        }
        UsersServiceError::InviteExpired => {
            StatusError::unprocessable_entity().brief("Invitation has expired")
        }
        UsersServiceError::InviteUsed => {
            StatusError::unprocessable_entity().brief("Invitation has already been used")
        }
        UsersServiceError::UnknownRegion => {
            StatusError::unprocessable_entity().brief("Region has no points configuration")
        }
        UsersServiceError::Password(source) => {
            error!("failed to process password: {source}");

            StatusError::internal_server_error()
        }
        UsersServiceError::Sql(source) => {
            error!("users storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
