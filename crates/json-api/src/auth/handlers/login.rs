//! Login Handler

use std::{fmt, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use loyalty_app::auth::PlainPassword;

use crate::{
    auth::errors::into_status_error, extensions::*, state::State, users::models::UserResponse,
};

/// Login Request
#[derive(Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Login Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginResponse {
    /// Bearer token for the `Authorization` header. Shown once.
    pub token: String,
    pub expires_at: String,
    pub user: UserResponse,
}

/// Login Handler
#[endpoint(
    tags("auth"),
    summary = "Log In",
    responses(
        (status_code = StatusCode::OK, description = "Session opened"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Invalid email or password"),
        (status_code = StatusCode::FORBIDDEN, description = "Account awaiting approval"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<LoginRequest>,
    depot: &mut Depot,
) -> Result<Json<LoginResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();
    let password = PlainPassword::from(request.password);

    let issued = state
        .app
        .auth
        .login(&request.email, &password)
        .await
        .map_err(into_status_error)?;

    Ok(Json(LoginResponse {
        token: issued.token,
        expires_at: issued.session.expires_at.to_string(),
        user: issued.user.into(),
    }))
}
