//! Reject Deal Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use loyalty_app::domain::users::records::Role;

use crate::{
    deals::{errors::into_status_error, models::DealResponse},
    extensions::*,
    observability::{DomainEvent, record_event},
    state::State,
};

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct RejectDealRequest {
    pub reason: Option<String>,
}

/// Reject Deal Handler
#[endpoint(
    tags("admin"),
    summary = "Reject Deal",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Deal rejected"),
        (status_code = StatusCode::NOT_FOUND, description = "Deal not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Deal is not pending"),
    ),
)]
pub(crate) async fn handler(
    deal: PathParam<Uuid>,
    json: JsonBody<RejectDealRequest>,
    depot: &mut Depot,
) -> Result<Json<DealResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_with_role(Role::RegionalAdmin)?;

    let reason = json
        .into_inner()
        .reason
        .map(|reason| reason.trim().to_string())
        .filter(|reason| !reason.is_empty());

    let deal = state
        .app
        .deals
        .reject_deal(principal, deal.into_inner().into(), reason)
        .await
        .map_err(into_status_error)?;

    record_event(DomainEvent::DealRejected);

    Ok(Json(deal.into()))
}
