//! Points Balance Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    points::{errors::into_status_error, models::BalanceResponse},
    state::State,
};

/// Points Balance Handler
///
/// Earned, spent and available points, and whether the caller has reached
/// the grand prize threshold for their region.
#[endpoint(
    tags("points"),
    summary = "Get Points Balance",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<BalanceResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let summary = state
        .app
        .points
        .balance(principal.user_uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(summary.into()))
}
