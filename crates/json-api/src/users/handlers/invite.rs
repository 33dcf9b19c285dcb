//! Invite User Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use loyalty_app::domain::users::{data::NewInvite, records::Role};

use crate::{
    extensions::*,
    state::State,
    users::{
        errors::into_status_error,
        models::{UserResponse, parse_region},
    },
};

/// Invite User Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct InviteUserRequest {
    pub email: String,

    /// Defaults to `user`
    pub role: Option<String>,
    pub region: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
}

/// Invite User Handler
///
/// Creates an approved account and emails a one-time registration link.
#[endpoint(
    tags("admin"),
    summary = "Invite User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Invitation sent"),
        (status_code = StatusCode::CONFLICT, description = "Email already registered"),
        (status_code = StatusCode::FORBIDDEN, description = "Role may not invite this user"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<InviteUserRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_with_role(Role::RegionalAdmin)?;
    let request = json.into_inner();

    let role = request
        .role
        .as_deref()
        .map(str::parse::<Role>)
        .transpose()
        .or_400("invalid role")?
        .unwrap_or(Role::User);

    let invite = NewInvite {
        email: request.email,
        role,
        region: parse_region(request.region.as_deref())?,
        first_name: request.first_name,
        last_name: request.last_name,
        company: request.company,
    };

    let issued = state
        .app
        .users
        .invite_user(principal, invite)
        .await
        .map_err(into_status_error)?;

    info!(user_uuid = %issued.user.uuid, role = %role, "invited user");

    res.status_code(StatusCode::CREATED);

    Ok(Json(issued.user.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use loyalty_app::domain::users::{
        MockUsersService, UsersServiceError, data::IssuedInvite, records::UserUuid,
    };

    use crate::test_helpers::{Mocks, make_user, north, principal};

    use super::*;

    fn make_service(users: MockUsersService, role: Role) -> TestResult<Service> {
        Ok(Mocks {
            users,
            ..Mocks::default()
        }
        .service(
            Some(principal(role)?),
            Router::with_path("admin/users/invite").post(handler),
        ))
    }

    #[tokio::test]
    async fn test_invite_defaults_to_user_role() -> TestResult {
        let uuid = UserUuid::new();
        let user = make_user(uuid, Role::User)?;
        let region = north()?;

        let mut users = MockUsersService::new();

        users
            .expect_invite_user()
            .once()
            .withf(move |_, invite| {
                invite.email == "new@example.com"
                    && invite.role == Role::User
                    && invite.region.as_ref() == Some(&region)
            })
            .return_once(move |_, _| {
                Ok(IssuedInvite {
                    user,
                    token: "ab".repeat(32),
                })
            });

        let mut res = TestClient::post("http://example.com/admin/users/invite")
            .json(&json!({ "email": "new@example.com", "region": "North" }))
            .send(&make_service(users, Role::RegionalAdmin)?)
            .await;

        let body: UserResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.uuid, uuid.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_invite_outside_permissions_returns_403() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_invite_user()
            .once()
            .return_once(|_, _| Err(UsersServiceError::Forbidden));

        let res = TestClient::post("http://example.com/admin/users/invite")
            .json(&json!({ "email": "boss@example.com", "role": "admin" }))
            .send(&make_service(users, Role::RegionalAdmin)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_invite_unknown_role_returns_400() -> TestResult {
        let res = TestClient::post("http://example.com/admin/users/invite")
            .json(&json!({ "email": "new@example.com", "role": "owner" }))
            .send(&make_service(MockUsersService::new(), Role::Admin)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
