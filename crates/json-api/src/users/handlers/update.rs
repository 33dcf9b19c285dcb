//! Update User Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use loyalty_app::domain::users::{data::UserUpdate, records::Role};

use crate::{
    extensions::*,
    state::State,
    users::{
        errors::into_status_error,
        models::{UserResponse, parse_region},
    },
};

/// Update User Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateUserRequest {
    pub role: Option<String>,
    pub region: Option<String>,
}

/// Update User Handler
///
/// Changes a user's role or region.
#[endpoint(
    tags("admin"),
    summary = "Update User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "User updated"),
        (status_code = StatusCode::NOT_FOUND, description = "User not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
#[tracing::instrument(
    name = "users.update",
    skip(user, json, depot),
    fields(user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    json: JsonBody<UpdateUserRequest>,
    depot: &mut Depot,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_with_role(Role::SuperAdmin)?;
    let request = json.into_inner();
    let user = user.into_inner();

    tracing::Span::current().record("user_uuid", tracing::field::display(user));

    let update = UserUpdate {
        role: request
            .role
            .as_deref()
            .map(str::parse::<Role>)
            .transpose()
            .or_400("invalid role")?,
        region: parse_region(request.region.as_deref())?,
    };

    let user = state
        .app
        .users
        .update_user(principal, user.into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use loyalty_app::domain::users::{MockUsersService, records::UserUuid};

    use crate::test_helpers::{Mocks, make_user, principal};

    use super::*;

    fn make_service(users: MockUsersService, role: Role) -> TestResult<Service> {
        Ok(Mocks {
            users,
            ..Mocks::default()
        }
        .service(
            Some(principal(role)?),
            Router::with_path("admin/users/{user}").patch(handler),
        ))
    }

    #[tokio::test]
    async fn test_update_changes_role() -> TestResult {
        let uuid = UserUuid::new();
        let user = make_user(uuid, Role::RegionalAdmin)?;

        let mut users = MockUsersService::new();

        users
            .expect_update_user()
            .once()
            .withf(move |_, u, update| {
                *u == uuid && update.role == Some(Role::RegionalAdmin) && update.region.is_none()
            })
            .return_once(move |_, _, _| Ok(user));

        let body: UserResponse = TestClient::patch(format!("http://example.com/admin/users/{uuid}"))
            .json(&json!({ "role": "regional_admin" }))
            .send(&make_service(users, Role::SuperAdmin)?)
            .await
            .take_json()
            .await?;

        assert_eq!(body.role, "regional_admin");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_as_admin_returns_403() -> TestResult {
        let uuid = UserUuid::new();

        let res = TestClient::patch(format!("http://example.com/admin/users/{uuid}"))
            .json(&json!({ "role": "admin" }))
            .send(&make_service(MockUsersService::new(), Role::Admin)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
