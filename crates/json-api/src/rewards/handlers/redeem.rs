//! Redeem Reward Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{
    extensions::*,
    observability::{DomainEvent, record_event},
    redemptions::{errors::into_status_error, models::RedemptionResponse},
    state::State,
};

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct RedeemRequest {
    pub shipping_address: Option<String>,
}

/// Redeem Reward Handler
///
/// Spends the reward's cost from the caller's balance and reserves one unit
/// of stock. The redemption starts out pending admin review. The body is
/// optional: an empty request redeems without a shipping address.
#[endpoint(
    tags("rewards"),
    summary = "Redeem Reward",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Redemption placed"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Reward unavailable, out of stock, outside the redemption window or insufficient points"),
    ),
)]
#[tracing::instrument(
    name = "rewards.redeem",
    skip(reward, req, depot, res),
    fields(reward_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    reward: PathParam<Uuid>,
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<RedemptionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let reward = reward.into_inner();

    tracing::Span::current().record("reward_uuid", tracing::field::display(reward));

    let shipping_address = read_request(req)
        .await?
        .shipping_address
        .map(|address| address.trim().to_string())
        .filter(|address| !address.is_empty());

    let redemption = state
        .app
        .redemptions
        .redeem(principal.user_uuid, reward.into(), shipping_address)
        .await
        .map_err(into_status_error)?;

    info!(
        redemption_uuid = %redemption.uuid,
        points_spent = redemption.points_spent,
        "placed redemption"
    );

    record_event(DomainEvent::RewardRedeemed);

    res.status_code(StatusCode::CREATED);

    Ok(Json(redemption.into()))
}

async fn read_request(req: &mut Request) -> Result<RedeemRequest, StatusError> {
    let payload = req
        .payload()
        .await
        .or_400("Invalid redemption payload")?;

    if payload.iter().all(u8::is_ascii_whitespace) {
        return Ok(RedeemRequest::default());
    }

    serde_json::from_slice(payload).or_400("Invalid redemption payload")
}
