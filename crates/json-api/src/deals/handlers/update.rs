//! Update Deal Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use crate::{
    deals::{
        errors::into_status_error,
        models::{DealRequest, DealResponse},
    },
    extensions::*,
    state::State,
};

/// Update Deal Handler
///
/// Owners may edit a deal while it is pending.
#[endpoint(
    tags("deals"),
    summary = "Update Deal",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Deal updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Deal not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Deal already decided"),
    ),
)]
#[tracing::instrument(
    name = "deals.update",
    skip(deal, json, depot),
    fields(deal_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    deal: PathParam<Uuid>,
    json: JsonBody<DealRequest>,
    depot: &mut Depot,
) -> Result<Json<DealResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let update = json.into_inner().into_update()?;
    let deal = deal.into_inner();

    tracing::Span::current().record("deal_uuid", tracing::field::display(deal));

    let deal = state
        .app
        .deals
        .update_deal(principal, deal.into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(deal.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use loyalty_app::domain::{
        deals::{DealsServiceError, MockDealsService, records::DealUuid},
        users::records::Role,
    };

    use crate::test_helpers::{Mocks, principal};

    use super::{super::tests::make_deal, *};

    fn make_service(deals: MockDealsService) -> TestResult<Service> {
        Ok(Mocks {
            deals,
            ..Mocks::default()
        }
        .service(
            Some(principal(Role::User)?),
            Router::with_path("deals/{deal}").put(handler),
        ))
    }

    #[tokio::test]
    async fn test_update_changes_only_given_fields() -> TestResult {
        let uuid = DealUuid::new();

        let mut deals = MockDealsService::new();

        deals
            .expect_update_deal()
            .once()
            .withf(move |_, d, update| {
                *d == uuid
                    && update.deal_value == Some(750_000)
                    && update.customer_name.is_none()
                    && update.product_type.is_none()
            })
            .return_once(move |actor, _, _| {
                let mut deal = make_deal(uuid, actor.user_uuid);

                deal.deal_value = 750_000;

                Ok(deal)
            });

        let body: DealResponse = TestClient::put(format!("http://example.com/deals/{uuid}"))
            .json(&json!({ "deal_value": 750_000 }))
            .send(&make_service(deals)?)
            .await
            .take_json()
            .await?;

        assert_eq!(body.deal_value, 750_000);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_decided_deal_returns_422() -> TestResult {
        let uuid = DealUuid::new();

        let mut deals = MockDealsService::new();

        deals
            .expect_update_deal()
            .once()
            .return_once(|_, _, _| Err(DealsServiceError::InvalidTransition));

        let res = TestClient::put(format!("http://example.com/deals/{uuid}"))
            .json(&json!({ "quantity": 3 }))
            .send(&make_service(deals)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }
}
