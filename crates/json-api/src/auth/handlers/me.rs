//! Current User Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, models::UserResponse},
};

/// Current User Handler
///
/// Returns the account behind the bearer token.
#[endpoint(
    tags("auth"),
    summary = "Current User",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let user = state
        .app
        .users
        .get_user(principal.user_uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use loyalty_app::domain::users::{MockUsersService, records::Role};

    use crate::test_helpers::{Mocks, make_user, principal};

    use super::*;

    #[tokio::test]
    async fn test_me_returns_the_caller() -> TestResult {
        let principal = principal(Role::User)?;
        let uuid = principal.user_uuid;
        let user = make_user(uuid, Role::User)?;

        let mut users = MockUsersService::new();

        users
            .expect_get_user()
            .once()
            .withf(move |u| *u == uuid)
            .return_once(move |_| Ok(user));

        let service = Mocks {
            users,
            ..Mocks::default()
        }
        .service(Some(principal), Router::with_path("auth/me").get(handler));

        let body: UserResponse = TestClient::get("http://example.com/auth/me")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.region.as_deref(), Some("north"));

        Ok(())
    }

    #[tokio::test]
    async fn test_me_without_principal_returns_401() -> TestResult {
        let res = TestClient::get("http://example.com/auth/me")
            .send(&Mocks::default().service(None, Router::with_path("auth/me").get(handler)))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
