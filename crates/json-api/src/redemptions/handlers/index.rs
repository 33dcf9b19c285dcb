//! Redemption Index Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    redemptions::{errors::into_status_error, models::RedemptionsResponse},
    state::State,
};

/// Redemption Index Handler
///
/// Returns the caller's own redemptions, newest first.
#[endpoint(
    tags("rewards"),
    summary = "List My Redemptions",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<RedemptionsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let redemptions = state
        .app
        .redemptions
        .list_redemptions_for_user(principal.user_uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(RedemptionsResponse {
        redemptions: redemptions.into_iter().map(Into::into).collect(),
    }))
}
