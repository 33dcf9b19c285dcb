//! Reject User Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use loyalty_app::domain::users::records::Role;

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, models::UserResponse},
};

/// Reject User Handler
#[endpoint(
    tags("admin"),
    summary = "Reject User",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "User rejected"),
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
        .reject_user(principal, user.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use loyalty_app::domain::users::{MockUsersService, UsersServiceError, records::UserUuid};

    use crate::test_helpers::{Mocks, make_user, principal};

    use super::*;

    fn make_service(users: MockUsersService) -> TestResult<Service> {
        Ok(Mocks {
            users,
            ..Mocks::default()
        }
        .service(
            Some(principal(Role::RegionalAdmin)?),
            Router::with_path("admin/users/{user}/reject").post(handler),
        ))
    }

    #[tokio::test]
    async fn test_reject_returns_rejected_user() -> TestResult {
        let uuid = UserUuid::new();
        let mut user = make_user(uuid, Role::User)?;

        user.is_approved = false;
        user.rejected_at = user.approved_at.take();

        let mut users = MockUsersService::new();

        users
            .expect_reject_user()
            .once()
            .withf(move |actor, u| actor.role == Role::RegionalAdmin && *u == uuid)
            .return_once(move |_, _| Ok(user));

        let body: UserResponse =
            TestClient::post(format!("http://example.com/admin/users/{uuid}/reject"))
                .send(&make_service(users)?)
                .await
                .take_json()
                .await?;

        assert_eq!(body.approval_status, "rejected");

        Ok(())
    }

    #[tokio::test]
    async fn test_reject_other_region_returns_403() -> TestResult {
        let uuid = UserUuid::new();

        let mut users = MockUsersService::new();

        users
            .expect_reject_user()
            .once()
            .return_once(|_, _| Err(UsersServiceError::Forbidden));

        let res = TestClient::post(format!("http://example.com/admin/users/{uuid}/reject"))
            .send(&make_service(users)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
