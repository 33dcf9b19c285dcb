//! Approve Deal Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::info;
use uuid::Uuid;

use loyalty_app::domain::users::records::Role;

use crate::{
    deals::{errors::into_status_error, models::DealResponse},
    extensions::*,
    observability::{DomainEvent, record_event},
    state::State,
};

/// Approve Deal Handler
///
/// Awards points at the owner's regional rate and records the ledger entry.
#[endpoint(
    tags("admin"),
    summary = "Approve Deal",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Deal approved"),
        (status_code = StatusCode::NOT_FOUND, description = "Deal not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Deal is not pending"),
    ),
)]
pub(crate) async fn handler(
    deal: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<DealResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_with_role(Role::RegionalAdmin)?;

    let deal = state
        .app
        .deals
        .approve_deal(principal, deal.into_inner().into())
        .await
        .map_err(into_status_error)?;

    info!(deal_uuid = %deal.uuid, points = deal.points_earned, "approved deal");

    record_event(DomainEvent::DealApproved);

    Ok(Json(deal.into()))
}
