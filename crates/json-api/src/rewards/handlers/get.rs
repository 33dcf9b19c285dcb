//! Get Reward Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use loyalty_app::domain::users::records::Role;

use crate::{
    extensions::*,
    rewards::{errors::into_status_error, models::RewardResponse},
    state::State,
};

/// Get Reward Handler
///
/// Retired rewards are only visible to admins.
#[endpoint(
    tags("rewards"),
    summary = "Get Reward",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    reward: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<RewardResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let reward = state
        .app
        .rewards
        .get_reward(reward.into_inner().into())
        .await
        .map_err(into_status_error)?;

    if !reward.is_active && !principal.has_role(Role::Admin) {
        return Err(StatusError::not_found().brief("Reward not found"));
    }

    Ok(Json(reward.into()))
}
