//! Invitation Handlers

use std::{fmt, sync::Arc};

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use loyalty_app::{
    auth::PlainPassword,
    domain::users::{data::InviteCompletion, records::InviteRecord},
};

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, models::UserResponse},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct InviteResponse {
    pub email: String,
    pub role: String,
    pub region: Option<String>,
    pub expires_at: String,
}

impl From<InviteRecord> for InviteResponse {
    fn from(invite: InviteRecord) -> Self {
        InviteResponse {
            email: invite.email,
            role: invite.role.as_str().to_string(),
            region: invite.region.map(String::from),
            expires_at: invite.expires_at.to_string(),
        }
    }
}

/// Complete Invitation Request
#[derive(Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterWithTokenRequest {
    pub token: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for RegisterWithTokenRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterWithTokenRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Verify Invitation Handler
///
/// Returns who an invitation was issued to, if it is still usable.
#[endpoint(
    tags("auth"),
    summary = "Verify Invitation",
    responses(
        (status_code = StatusCode::OK, description = "Invitation is valid"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown invitation"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invitation expired or used"),
    ),
)]
pub(crate) async fn verify(
    token: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<InviteResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let invite = state
        .app
        .users
        .verify_invite(&token.into_inner())
        .await
        .map_err(into_status_error)?;

    Ok(Json(invite.into()))
}

/// Complete Invitation Handler
///
/// Sets username and password on an invited account.
#[endpoint(
    tags("auth"),
    summary = "Register With Invitation",
    responses(
        (status_code = StatusCode::OK, description = "Account ready"),
        (status_code = StatusCode::CONFLICT, description = "Username taken"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Invitation expired or used"),
    ),
)]
pub(crate) async fn register(
    json: JsonBody<RegisterWithTokenRequest>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let user = state
        .app
        .users
        .register_with_token(InviteCompletion {
            token: request.token,
            username: request.username,
            password: PlainPassword::from(request.password),
        })
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}
