//! Get Points Config Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use loyalty_app::domain::users::records::Role;

use crate::{
    extensions::*,
    points_config::{
        errors::into_status_error,
        models::{PointsConfigResponse, parse_region},
    },
    state::State,
};

/// Get Points Config Handler
///
/// Regional admins may only read their own region.
#[endpoint(
    tags("admin"),
    summary = "Get Points Configuration",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    region: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<PointsConfigResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_with_role(Role::RegionalAdmin)?;
    let region = parse_region(&region.into_inner())?;

    let config = state
        .app
        .points_config
        .get_config(principal, &region)
        .await
        .map_err(into_status_error)?;

    Ok(Json(config.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use loyalty_app::domain::points_config::{MockPointsConfigService, PointsConfigServiceError};

    use crate::test_helpers::{Mocks, principal};

    use super::{super::tests::make_config, *};

    fn make_service(points_config: MockPointsConfigService) -> TestResult<Service> {
        Ok(Mocks {
            points_config,
            ..Mocks::default()
        }
        .service(
            Some(principal(Role::RegionalAdmin)?),
            Router::with_path("admin/points-config/{region}").get(handler),
        ))
    }

    #[tokio::test]
    async fn test_get_returns_config() -> TestResult {
        let mut points_config = MockPointsConfigService::new();

        points_config
            .expect_get_config()
            .once()
            .withf(|_, region| region.as_str() == "north")
            .return_once(|_, region| Ok(make_config(region.clone())));

        let res = TestClient::get("http://example.com/admin/points-config/north")
            .send(&make_service(points_config)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_other_region_returns_403() -> TestResult {
        let mut points_config = MockPointsConfigService::new();

        points_config
            .expect_get_config()
            .once()
            .return_once(|_, _| Err(PointsConfigServiceError::Forbidden));

        let res = TestClient::get("http://example.com/admin/points-config/south")
            .send(&make_service(points_config)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_unconfigured_region_returns_404() -> TestResult {
        let mut points_config = MockPointsConfigService::new();

        points_config
            .expect_get_config()
            .once()
            .return_once(|_, _| Err(PointsConfigServiceError::NotFound));

        let res = TestClient::get("http://example.com/admin/points-config/north")
            .send(&make_service(points_config)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
