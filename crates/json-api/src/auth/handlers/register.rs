//! Register Handler

use std::{fmt, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use loyalty_app::{auth::PlainPassword, domain::users::data::NewRegistration};

use crate::{
    extensions::*,
    observability::{DomainEvent, record_event},
    state::State,
    users::{
        errors::into_status_error,
        models::{UserResponse, parse_region},
    },
};

/// Self-service Registration Request
#[derive(Serialize, Deserialize, ToSchema)]
pub(crate) struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub region: Option<String>,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Register Handler
///
/// Creates an account that waits for admin approval before it can log in.
#[endpoint(
    tags("auth"),
    summary = "Register",
    responses(
        (status_code = StatusCode::CREATED, description = "Registration received"),
        (status_code = StatusCode::CONFLICT, description = "Email or username taken"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RegisterRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<UserResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let registration = NewRegistration {
        region: parse_region(request.region.as_deref())?,
        email: request.email,
        username: request.username,
        password: PlainPassword::from(request.password),
        first_name: request.first_name,
        last_name: request.last_name,
        company: request.company,
    };

    let user = state
        .app
        .users
        .register(registration)
        .await
        .map_err(into_status_error)?;

    record_event(DomainEvent::UserRegistered);

    res.status_code(StatusCode::CREATED);

    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use loyalty_app::domain::users::{
        MockUsersService, UsersServiceError,
        records::{Role, UserUuid},
    };

    use crate::test_helpers::{Mocks, make_user};

    use super::*;

    fn make_service(users: MockUsersService) -> Service {
        Mocks {
            users,
            ..Mocks::default()
        }
        .service(None, Router::with_path("auth/register").post(handler))
    }

    #[tokio::test]
    async fn test_register_returns_pending_user() -> TestResult {
        let uuid = UserUuid::new();
        let mut user = make_user(uuid, Role::User)?;

        user.is_approved = false;
        user.approved_at = None;

        let mut users = MockUsersService::new();

        users
            .expect_register()
            .once()
            .withf(|registration| {
                registration.email == "pat@example.com"
                    && registration.password.expose() == "correct horse"
                    && registration.region.is_none()
            })
            .return_once(move |_| Ok(user));

        let mut res = TestClient::post("http://example.com/auth/register")
            .json(&json!({
                "email": "pat@example.com",
                "username": "pat",
                "password": "correct horse",
            }))
            .send(&make_service(users))
            .await;

        let body: UserResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.approval_status, "pending");

        Ok(())
    }

    #[tokio::test]
    async fn test_register_weak_password_returns_400() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_register()
            .once()
            .return_once(|_| Err(UsersServiceError::WeakPassword));

        let res = TestClient::post("http://example.com/auth/register")
            .json(&json!({
                "email": "pat@example.com",
                "username": "pat",
                "password": "short",
            }))
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_register_duplicate_returns_409() -> TestResult {
        let mut users = MockUsersService::new();

        users
            .expect_register()
            .once()
            .return_once(|_| Err(UsersServiceError::AlreadyExists));

        let res = TestClient::post("http://example.com/auth/register")
            .json(&json!({
                "email": "pat@example.com",
                "username": "pat",
                "password": "correct horse",
            }))
            .send(&make_service(users))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
