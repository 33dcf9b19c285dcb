//! Points Config Index Handler

use std::sync::Arc;

use salvo::prelude::*;

use loyalty_app::domain::users::records::Role;

use crate::{
    extensions::*,
    points_config::{errors::into_status_error, models::PointsConfigsResponse},
    state::State,
};

/// Points Config Index Handler
#[endpoint(
    tags("admin"),
    summary = "List Points Configurations",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<PointsConfigsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_with_role(Role::Admin)?;

    let configs = state
        .app
        .points_config
        .list_configs(principal)
        .await
        .map_err(into_status_error)?;

    Ok(Json(PointsConfigsResponse {
        configs: configs.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use loyalty_app::domain::points_config::MockPointsConfigService;

    use crate::test_helpers::{Mocks, north, principal};

    use super::{super::tests::make_config, *};

    fn make_service(points_config: MockPointsConfigService, role: Role) -> TestResult<Service> {
        Ok(Mocks {
            points_config,
            ..Mocks::default()
        }
        .service(
            Some(principal(role)?),
            Router::with_path("admin/points-config").get(handler),
        ))
    }

    #[tokio::test]
    async fn test_index_lists_regions() -> TestResult {
        let region = north()?;

        let mut points_config = MockPointsConfigService::new();

        points_config
            .expect_list_configs()
            .once()
            .return_once(move |_| Ok(vec![make_config(region)]));

        let body: PointsConfigsResponse = TestClient::get("http://example.com/admin/points-config")
            .send(&make_service(points_config, Role::Admin)?)
            .await
            .take_json()
            .await?;

        assert_eq!(body.configs.len(), 1);
        assert_eq!(body.configs[0].region, "north");
        assert_eq!(body.configs[0].hardware_cents_per_point, 1_000);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_as_regional_admin_returns_403() -> TestResult {
        let res = TestClient::get("http://example.com/admin/points-config")
            .send(&make_service(MockPointsConfigService::new(), Role::RegionalAdmin)?)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }
}
