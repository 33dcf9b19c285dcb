//! Points Adjustment Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use tracing::info;

use loyalty_app::domain::users::records::Role;

use crate::{
    extensions::*,
    observability::{DomainEvent, record_event},
    points::{
        errors::into_status_error,
        models::{AdjustmentRequest, PointsEntryResponse},
    },
    state::State,
};

/// Points Adjustment Handler
///
/// Manual credit or debit. A debit may not take the balance below zero.
#[endpoint(
    tags("admin"),
    summary = "Adjust Points",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Adjustment recorded"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Balance would go negative"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AdjustmentRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<PointsEntryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_with_role(Role::Admin)?;

    let entry = state
        .app
        .points
        .adjust(principal, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    info!(
        user_uuid = %entry.user_uuid,
        points = entry.points,
        actor = %principal.user_uuid,
        "adjusted points"
    );

    record_event(DomainEvent::PointsAdjusted);

    res.status_code(StatusCode::CREATED);

    Ok(Json(entry.into()))
}
