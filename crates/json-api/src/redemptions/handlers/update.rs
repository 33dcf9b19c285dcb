//! Update Redemption Status Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use tracing::info;
use uuid::Uuid;

use loyalty_app::domain::users::records::Role;

use crate::{
    extensions::*,
    observability::{DomainEvent, record_event},
    redemptions::{
        errors::into_status_error,
        models::{RedemptionResponse, UpdateRedemptionRequest},
    },
    state::State,
};

/// Update Redemption Status Handler
///
/// Moves a redemption through review and fulfilment. Rejecting refunds the
/// points and returns the reserved stock.
#[endpoint(
    tags("admin"),
    summary = "Update Redemption Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Redemption updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Redemption not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Transition not allowed"),
    ),
)]
pub(crate) async fn handler(
    redemption: PathParam<Uuid>,
    json: JsonBody<UpdateRedemptionRequest>,
    depot: &mut Depot,
) -> Result<Json<RedemptionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_with_role(Role::RegionalAdmin)?;
    let update = json.into_inner().into_update()?;

    let redemption = state
        .app
        .redemptions
        .update_redemption_status(principal, redemption.into_inner().into(), update)
        .await
        .map_err(into_status_error)?;

    info!(
        redemption_uuid = %redemption.uuid,
        status = redemption.status.as_str(),
        "updated redemption status"
    );

    record_event(DomainEvent::RedemptionUpdated);

    Ok(Json(redemption.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use loyalty_app::domain::{
        redemptions::{
            MockRedemptionsService, RedemptionsServiceError,
            records::{RedemptionStatus, RedemptionUuid},
        },
        rewards::records::RewardUuid,
        users::records::UserUuid,
    };

    use crate::test_helpers::{Mocks, make_redemption, principal};

    use super::*;

    fn make_service(redemptions: MockRedemptionsService) -> TestResult<Service> {
        Ok(Mocks {
            redemptions,
            ..Mocks::default()
        }
        .service(
            Some(principal(Role::Admin)?),
            Router::with_path("admin/redemptions/{redemption}").patch(handler),
        ))
    }

    #[tokio::test]
    async fn test_update_ships_with_tracking_number() -> TestResult {
        let uuid = RedemptionUuid::new();

        let mut redemptions = MockRedemptionsService::new();

        redemptions
            .expect_update_redemption_status()
            .once()
            .withf(move |_, r, update| {
                *r == uuid
                    && update.status == RedemptionStatus::Shipped
                    && update.tracking_number.as_deref() == Some("1Z999")
            })
            .return_once(move |_, _, update| {
                let mut redemption = make_redemption(uuid, UserUuid::new(), RewardUuid::new());

                redemption.status = update.status;
                redemption.tracking_number = update.tracking_number;

                Ok(redemption)
            });

        let body: RedemptionResponse =
            TestClient::patch(format!("http://example.com/admin/redemptions/{uuid}"))
                .json(&json!({ "status": "shipped", "tracking_number": "1Z999" }))
                .send(&make_service(redemptions)?)
                .await
                .take_json()
                .await?;

        assert_eq!(body.status, "shipped");
        assert_eq!(body.tracking_number.as_deref(), Some("1Z999"));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_invalid_transition_returns_422() -> TestResult {
        let uuid = RedemptionUuid::new();

        let mut redemptions = MockRedemptionsService::new();

        redemptions
            .expect_update_redemption_status()
            .once()
            .return_once(|_, _, _| {
                Err(RedemptionsServiceError::InvalidTransition {
                    from: "delivered".to_string(),
                    to: "pending".to_string(),
                })
            });

        let res = TestClient::patch(format!("http://example.com/admin/redemptions/{uuid}"))
            .json(&json!({ "status": "pending" }))
            .send(&make_service(redemptions)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_unknown_status_returns_400() -> TestResult {
        let uuid = RedemptionUuid::new();

        let res = TestClient::patch(format!("http://example.com/admin/redemptions/{uuid}"))
            .json(&json!({ "status": "lost" }))
            .send(&make_service(MockRedemptionsService::new())?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
