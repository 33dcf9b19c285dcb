//! Reward Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use loyalty_app::domain::users::records::Role;

use crate::{
    extensions::*,
    rewards::{errors::into_status_error, models::RewardsResponse},
    state::State,
};

/// Reward Index Handler
///
/// Lists the active catalog, cheapest first. Admins may pass
/// `include_inactive=true` to see retired rewards as well.
#[endpoint(
    tags("rewards"),
    summary = "List Rewards",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    include_inactive: QueryParam<bool, false>,
    depot: &mut Depot,
) -> Result<Json<RewardsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let include_inactive =
        include_inactive.into_inner().unwrap_or(false) && principal.has_role(Role::Admin);

    let rewards = state
        .app
        .rewards
        .list_rewards(include_inactive)
        .await
        .map_err(into_status_error)?;

    Ok(Json(RewardsResponse {
        rewards: rewards.into_iter().map(Into::into).collect(),
    }))
}
