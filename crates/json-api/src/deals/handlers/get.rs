//! Get Deal Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    deals::{errors::into_status_error, models::DealResponse},
    extensions::*,
    state::State,
};

/// Get Deal Handler
///
/// Owners see their own deals; admins see deals in their scope.
#[endpoint(
    tags("deals"),
    summary = "Get Deal",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    deal: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<DealResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let deal = state
        .app
        .deals
        .get_deal(principal, deal.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(deal.into()))
}
