//! User Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use loyalty_app::domain::users::{
    data::UserFilter,
    records::{ApprovalStatus, Role},
};

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, models::UsersResponse},
};

/// User Index Handler
///
/// Lists accounts, optionally by approval status. Regional admins only see their region.
#[endpoint(
    tags("admin"),
    summary = "List Users",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<UsersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_with_role(Role::RegionalAdmin)?;

    let approval = status
        .into_inner()
        .map(|status| status.parse::<ApprovalStatus>())
        .transpose()
        .or_400("invalid status filter")?;

    let users = state
        .app
        .users
        .list_users(principal, UserFilter { approval })
        .await
        .map_err(into_status_error)?;

    Ok(Json(UsersResponse {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
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
            Router::with_path("admin/users").get(handler),
        ))
    }

    #[tokio::test]
    async fn test_index_forwards_status_filter() -> TestResult {
        let uuid = UserUuid::new();
        let user = make_user(uuid, Role::User)?;

        let mut users = MockUsersService::new();

        users
            .expect_list_users()
            .once()
            .withf(|actor, filter| {
                actor.role == Role::RegionalAdmin
                    && filter.approval == Some(ApprovalStatus::Pending)
            })
            .return_once(move |_, _| Ok(vec![user]));

        let response: UsersResponse =
            TestClient::get("http://example.com/admin/users?status=pending")
                .send(&make_service(users, Role::RegionalAdmin)?)
                .await
                .take_json()
                .await?;

        assert_eq!(response.users.len(), 1, "expected one user");
        assert_eq!(response.users[0].uuid, uuid.into_uuid());
        assert_eq!(response.users[0].approval_status, "approved");

        Ok(())
    }

    #[tokio::test]
    async fn test_index_unknown_status_returns_400() -> TestResult {
        let res = TestClient::get("http://example.com/admin/users?status=banned")
            .send(&make_service(MockUsersService::new(), Role::Admin)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_index_as_user_returns_403() -> TestResult {
        let mut users = MockUsersService::new();

        users.expect_list_users().never();

        let res = TestClient::get("http://example.com/admin/users")
            .send(&make_service(users, Role::User)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
