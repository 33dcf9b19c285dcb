//! Redemption request and response bodies.

use std::string::ToString;

use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use loyalty_app::domain::redemptions::{
    data::RedemptionStatusUpdate,
    records::{RedemptionRecord, RedemptionStatus},
};

use crate::extensions::*;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RedemptionResponse {
    pub uuid: Uuid,
    pub user_uuid: Uuid,
    pub reward_uuid: Uuid,
    pub points_spent: u64,

    /// `pending`, `approved`, `rejected`, `shipped` or `delivered`
    pub status: String,
    pub shipping_address: Option<String>,
    pub tracking_number: Option<String>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<String>,
    pub shipped_at: Option<String>,
    pub delivered_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<RedemptionRecord> for RedemptionResponse {
    fn from(redemption: RedemptionRecord) -> Self {
        RedemptionResponse {
            uuid: redemption.uuid.into(),
            user_uuid: redemption.user_uuid.into(),
            reward_uuid: redemption.reward_uuid.into(),
            points_spent: redemption.points_spent,
            status: redemption.status.as_str().to_string(),
            shipping_address: redemption.shipping_address,
            tracking_number: redemption.tracking_number,
            approved_by: redemption.approved_by.map(Into::into),
            approved_at: redemption.approved_at.as_ref().map(ToString::to_string),
            shipped_at: redemption.shipped_at.as_ref().map(ToString::to_string),
            delivered_at: redemption.delivered_at.as_ref().map(ToString::to_string),
            created_at: redemption.created_at.to_string(),
            updated_at: redemption.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RedemptionsResponse {
    pub redemptions: Vec<RedemptionResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateRedemptionRequest {
    pub status: String,
    pub tracking_number: Option<String>,
}

impl UpdateRedemptionRequest {
    pub(crate) fn into_update(self) -> Result<RedemptionStatusUpdate, StatusError> {
        Ok(RedemptionStatusUpdate {
            status: self.status.parse().or_400("invalid status")?,
            tracking_number: self
                .tracking_number
                .map(|number| number.trim().to_string())
                .filter(|number| !number.is_empty()),
        })
    }
}

pub(crate) fn parse_status(value: Option<String>) -> Result<Option<RedemptionStatus>, StatusError> {
    value
        .as_deref()
        .map(str::parse::<RedemptionStatus>)
        .transpose()
        .or_400("invalid status filter")
}
