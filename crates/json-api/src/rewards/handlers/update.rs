//! Update Reward Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use loyalty_app::domain::users::records::Role;

use crate::{
    extensions::*,
    rewards::{
        errors::into_status_error,
        models::{RewardResponse, UpdateRewardRequest},
    },
    state::State,
};

/// Update Reward Handler
///
/// Rewards are retired by setting `is_active` to false.
#[endpoint(
    tags("admin"),
    summary = "Update Reward",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    reward: PathParam<Uuid>,
    json: JsonBody<UpdateRewardRequest>,
    depot: &mut Depot,
) -> Result<Json<RewardResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_with_role(Role::Admin)?;

    let reward = state
        .app
        .rewards
        .update_reward(principal, reward.into_inner().into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(reward.into()))
}
