//! Deal Index Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    deals::{errors::into_status_error, models::DealsResponse},
    extensions::*,
    state::State,
};

/// Deal Index Handler
///
/// Returns the caller's own deals, newest first.
#[endpoint(
    tags("deals"),
    summary = "List My Deals",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<DealsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let deals = state
        .app
        .deals
        .list_deals_for_user(principal.user_uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(DealsResponse {
        deals: deals.into_iter().map(Into::into).collect(),
    }))
}
