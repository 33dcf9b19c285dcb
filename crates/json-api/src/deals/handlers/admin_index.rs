//! Admin Deal Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use loyalty_app::domain::{deals::data::DealFilter, users::records::Role};

use crate::{
    deals::{
        errors::into_status_error,
        models::{DealsResponse, parse_status},
    },
    extensions::*,
    state::State,
};

/// Admin Deal Index Handler
///
/// Regional admins only see deals owned by users in their region.
#[endpoint(
    tags("admin"),
    summary = "List Deals",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<DealsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_with_role(Role::RegionalAdmin)?;

    let filter = DealFilter {
        status: parse_status(status.into_inner())?,
    };

    let deals = state
        .app
        .deals
        .list_deals(principal, filter)
        .await
        .map_err(into_status_error)?;

    Ok(Json(DealsResponse {
        deals: deals.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use loyalty_app::domain::{
        deals::{
            DealsServiceError, MockDealsService,
            records::{DealStatus, DealUuid},
        },
        users::records::UserUuid,
    };

    use crate::test_helpers::{Mocks, principal};

    use super::{super::tests::make_deal, *};

    fn make_service(deals: MockDealsService, role: Role) -> TestResult<Service> {
        Ok(Mocks {
            deals,
            ..Mocks::default()
        }
        .service(
            Some(principal(role)?),
            Router::with_path("admin/deals").get(handler),
        ))
    }

    #[tokio::test]
    async fn test_admin_index_filters_by_status() -> TestResult {
        let mut deals = MockDealsService::new();

        deals
            .expect_list_deals()
            .once()
            .withf(|_, filter| filter.status == Some(DealStatus::Pending))
            .return_once(|_, _| Ok(vec![make_deal(DealUuid::new(), UserUuid::new())]));

        let body: DealsResponse = TestClient::get("http://example.com/admin/deals?status=pending")
            .send(&make_service(deals, Role::RegionalAdmin)?)
            .await
            .take_json()
            .await?;

        assert_eq!(body.deals.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_index_without_status_lists_all() -> TestResult {
        let mut deals = MockDealsService::new();

        deals
            .expect_list_deals()
            .once()
            .withf(|_, filter| filter.status.is_none())
            .return_once(|_, _| Ok(vec![]));

        let res = TestClient::get("http://example.com/admin/deals")
            .send(&make_service(deals, Role::Admin)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_index_unknown_status_returns_400() -> TestResult {
        let res = TestClient::get("http://example.com/admin/deals?status=archived")
            .send(&make_service(MockDealsService::new(), Role::Admin)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_index_regional_admin_without_region_returns_403() -> TestResult {
        let mut deals = MockDealsService::new();

        deals
            .expect_list_deals()
            .once()
            .return_once(|_, _| Err(DealsServiceError::Forbidden));

        let res = TestClient::get("http://example.com/admin/deals")
            .send(&make_service(deals, Role::RegionalAdmin)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_index_as_user_returns_403() -> TestResult {
        let res = TestClient::get("http://example.com/admin/deals")
            .send(&make_service(MockDealsService::new(), Role::User)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
