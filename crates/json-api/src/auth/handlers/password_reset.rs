//! Password Reset Handlers

use std::{fmt, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use loyalty_app::auth::PlainPassword;

use crate::{extensions::*, state::State, users::errors::into_status_error};

/// Password Reset Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PasswordResetRequest {
    pub email: String,
}

/// Password Reset Confirmation
#[derive(Serialize, Deserialize, ToSchema)]
pub(crate) struct PasswordResetConfirmRequest {
    pub token: String,
    pub password: String,
}

impl fmt::Debug for PasswordResetConfirmRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordResetConfirmRequest")
            .finish_non_exhaustive()
    }
}

/// Request Password Reset Handler
///
/// Always answers 202 so the endpoint cannot be used to probe for accounts.
#[endpoint(
    tags("auth"),
    summary = "Request Password Reset",
    responses(
        (status_code = StatusCode::ACCEPTED, description = "Reset email sent if the account exists"),
    ),
)]
pub(crate) async fn request(
    json: JsonBody<PasswordResetRequest>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .users
        .request_password_reset(&json.into_inner().email)
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::ACCEPTED)
}

/// Confirm Password Reset Handler
#[endpoint(
    tags("auth"),
    summary = "Confirm Password Reset",
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Password replaced"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid token or weak password"),
    ),
)]
pub(crate) async fn confirm(
    json: JsonBody<PasswordResetConfirmRequest>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let confirm_request = json.into_inner();

    state
        .app
        .users
        .reset_password(&confirm_request.token, PlainPassword::from(confirm_request.password))
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}
