//! Create Deal Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::extract::JsonBody,
    prelude::*,
};
use tracing::info;

use crate::{
    deals::{
        errors::into_status_error,
        models::{DealRequest, DealResponse},
    },
    extensions::*,
    observability::{DomainEvent, record_event},
    state::State,
};

/// Create Deal Handler
///
/// Registers a closed deal for admin review. Points are awarded on approval.
#[endpoint(
    tags("deals"),
    summary = "Register Deal",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Deal registered"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<DealRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<DealResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let deal = json.into_inner().into_new_deal()?;

    let deal = state
        .app
        .deals
        .create_deal(principal.user_uuid, deal)
        .await
        .map_err(into_status_error)?;

    info!(deal_uuid = %deal.uuid, user_uuid = %deal.user_uuid, "registered deal");

    record_event(DomainEvent::DealRegistered);

    res.add_header(LOCATION, format!("/api/deals/{}", deal.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(deal.into()))
}
