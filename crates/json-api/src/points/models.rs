//! Points request and response bodies.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use loyalty_app::domain::points::{
    data::NewAdjustment,
    records::{PointsEntryRecord, PointsSummary},
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BalanceResponse {
    pub earned: u64,
    pub spent: u64,
    pub available: u64,
    pub grand_prize_threshold: u64,
    pub grand_prize_eligible: bool,
}

impl From<PointsSummary> for BalanceResponse {
    fn from(summary: PointsSummary) -> Self {
        BalanceResponse {
            earned: summary.earned,
            spent: summary.spent,
            available: summary.available,
            grand_prize_threshold: summary.grand_prize_threshold,
            grand_prize_eligible: summary.grand_prize_eligible,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PointsEntryResponse {
    pub uuid: Uuid,
    pub user_uuid: Uuid,

    /// Credits are positive, debits negative
    pub points: i64,

    /// `deal_approved`, `redemption`, `redemption_refund` or `adjustment`
    pub kind: String,
    pub deal_uuid: Option<Uuid>,
    pub redemption_uuid: Option<Uuid>,
    pub description: String,
    pub created_by: Option<Uuid>,
    pub created_at: String,
}

impl From<PointsEntryRecord> for PointsEntryResponse {
    fn from(entry: PointsEntryRecord) -> Self {
        PointsEntryResponse {
            uuid: entry.uuid.into(),
            user_uuid: entry.user_uuid.into(),
            points: entry.points,
            kind: entry.kind.as_str().to_string(),
            deal_uuid: entry.deal_uuid.map(Into::into),
            redemption_uuid: entry.user_reward_uuid.map(Into::into),
            description: entry.description,
            created_by: entry.created_by.map(Into::into),
            created_at: entry.created_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PointsHistoryResponse {
    pub entries: Vec<PointsEntryResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AdjustmentRequest {
    pub user_uuid: Uuid,

    /// Positive to credit, negative to debit
    pub points: i64,
    pub description: String,
}

impl From<AdjustmentRequest> for NewAdjustment {
    fn from(request: AdjustmentRequest) -> Self {
        NewAdjustment {
            user_uuid: request.user_uuid.into(),
            points: request.points,
            description: request.description,
        }
    }
}
