//! Approve User Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use loyalty_app::domain::users::records::Role;

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, models::UserResponse},
};

/// Approve User Handler
#[endpoint(
    tags("admin"),
    summary = "Approve User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "User approved"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "User is not pending"),
    ),
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_with_role(Role::RegionalAdmin)?;

    let user = state
        .app
        .users
        .approve_user(principal, user.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}
