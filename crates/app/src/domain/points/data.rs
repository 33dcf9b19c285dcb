//! Points Data

use crate::domain::{
    deals::records::DealUuid, points::records::PointsKind,
    redemptions::records::RedemptionUuid, users::records::UserUuid,
};

/// Ledger row to append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewPointsEntry {
    pub user_uuid: UserUuid,
    pub points: i64,
    pub kind: PointsKind,
    pub deal_uuid: Option<DealUuid>,
    pub user_reward_uuid: Option<RedemptionUuid>,
    pub description: String,
    pub created_by: Option<UserUuid>,
}

/// Manual credit (positive) or debit (negative) by an admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdjustment {
    pub user_uuid: UserUuid,
    pub points: i64,
    pub description: String,
}
