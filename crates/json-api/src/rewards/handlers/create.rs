//! Create Reward Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use loyalty_app::domain::users::records::Role;

use crate::{
    extensions::*,
    rewards::{
        errors::into_status_error,
        models::{CreateRewardRequest, RewardResponse},
    },
    state::State,
};

/// Create Reward Handler
#[endpoint(
    tags("admin"),
    summary = "Create Reward",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Reward created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateRewardRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<RewardResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_with_role(Role::Admin)?;

    let reward = state
        .app
        .rewards
        .create_reward(principal, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(reward.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use loyalty_app::domain::rewards::{
        MockRewardsService, RewardsServiceError, records::RewardUuid,
    };

    use crate::test_helpers::{Mocks, make_reward, principal};

    use super::*;

    fn make_service(rewards: MockRewardsService, role: Role) -> TestResult<Service> {
        Ok(Mocks {
            rewards,
            ..Mocks::default()
        }
        .service(
            Some(principal(role)?),
            Router::with_path("admin/rewards").post(handler),
        ))
    }

    #[tokio::test]
    async fn test_create_returns_201() -> TestResult {
        let mut rewards = MockRewardsService::new();

        rewards
            .expect_create_reward()
            .once()
            .withf(|_, reward| {
                reward.name == "Headphones" && reward.points_cost == 500 && reward.stock.is_none()
            })
            .return_once(|_, _| Ok(make_reward(RewardUuid::new())));

        let res = TestClient::post("http://example.com/admin/rewards")
            .json(&json!({
                "name": "Headphones",
                "points_cost": 500,
                "category": "electronics",
            }))
            .send(&make_service(rewards, Role::Admin)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_zero_cost_returns_400() -> TestResult {
        let mut rewards = MockRewardsService::new();

        rewards
            .expect_create_reward()
            .once()
            .return_once(|_, _| Err(RewardsServiceError::InvalidData));

        let res = TestClient::post("http://example.com/admin/rewards")
            .json(&json!({
                "name": "Headphones",
                "points_cost": 0,
                "category": "electronics",
            }))
            .send(&make_service(rewards, Role::Admin)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_as_regional_admin_returns_403() -> TestResult {
        let res = TestClient::post("http://example.com/admin/rewards")
            .json(&json!({
                "name": "Headphones",
                "points_cost": 500,
                "category": "electronics",
            }))
            .send(&make_service(MockRewardsService::new(), Role::RegionalAdmin)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
