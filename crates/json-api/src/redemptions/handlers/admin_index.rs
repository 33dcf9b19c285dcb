//! Admin Redemption Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use loyalty_app::domain::{redemptions::data::RedemptionFilter, users::records::Role};

use crate::{
    extensions::*,
    redemptions::{
        errors::into_status_error,
        models::{RedemptionsResponse, parse_status},
    },
    state::State,
};

/// Admin Redemption Index Handler
///
/// Regional admins only see redemptions placed by users in their region.
#[endpoint(
    tags("admin"),
    summary = "List Redemptions",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<RedemptionsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_with_role(Role::RegionalAdmin)?;

    let filter = RedemptionFilter {
        status: parse_status(status.into_inner())?,
    };

    let redemptions = state
        .app
        .redemptions
        .list_redemptions(principal, filter)
        .await
        .map_err(into_status_error)?;

    Ok(Json(RedemptionsResponse {
        redemptions: redemptions.into_iter().map(Into::into).collect(),
    }))
}
