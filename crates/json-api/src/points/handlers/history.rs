//! Points History Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    points::{errors::into_status_error, models::PointsHistoryResponse},
    state::State,
};

/// Points History Handler
#[endpoint(
    tags("points"),
    summary = "Get Points History",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<PointsHistoryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let entries = state
        .app
        .points
        .history(principal.user_uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(PointsHistoryResponse {
        entries: entries.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use loyalty_app::domain::{
        deals::records::DealUuid,
        points::{
            MockPointsService,
            records::{PointsEntryRecord, PointsEntryUuid, PointsKind},
        },
        users::records::Role,
    };

    use crate::test_helpers::{Mocks, principal};

    use super::*;

    #[tokio::test]
    async fn test_history_lists_entries() -> TestResult {
        let principal = principal(Role::User)?;
        let deal = DealUuid::new();

        let mut points = MockPointsService::new();

        points
            .expect_history()
            .once()
            .return_once(move |user| {
                Ok(vec![PointsEntryRecord {
                    uuid: PointsEntryUuid::new(),
                    user_uuid: user,
                    points: 1_000,
                    kind: PointsKind::DealApproved,
                    deal_uuid: Some(deal),
                    user_reward_uuid: None,
                    description: "Deal approved: Acme".to_string(),
                    created_by: None,
                    created_at: Timestamp::UNIX_EPOCH,
                }])
            });

        let service = Mocks {
            points,
            ..Mocks::default()
        }
        .service(
            Some(principal),
            Router::with_path("points/history").get(handler),
        );

        let body: PointsHistoryResponse = TestClient::get("http://example.com/points/history")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(body.entries.len(), 1);
        assert_eq!(body.entries[0].kind, "deal_approved");
        assert_eq!(body.entries[0].deal_uuid, Some(deal.into()));

        Ok(())
    }
}
