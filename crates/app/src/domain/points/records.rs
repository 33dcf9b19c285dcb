//! Points Records

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::Timestamp;

use crate::{
    domain::{
        UnknownVariant, deals::records::DealUuid, redemptions::records::RedemptionUuid,
        users::records::UserUuid,
    },
    uuids::TypedUuid,
};

/// Points Entry UUID
pub type PointsEntryUuid = TypedUuid<PointsEntryRecord>;

/// Why a ledger row was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointsKind {
    DealApproved,
    Redemption,
    RedemptionRefund,
    Adjustment,
}

impl PointsKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DealApproved => "deal_approved",
            Self::Redemption => "redemption",
            Self::RedemptionRefund => "redemption_refund",
            Self::Adjustment => "adjustment",
        }
    }
}

impl FromStr for PointsKind {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "deal_approved" => Ok(Self::DealApproved),
            "redemption" => Ok(Self::Redemption),
            "redemption_refund" => Ok(Self::RedemptionRefund),
            "adjustment" => Ok(Self::Adjustment),
            _ => Err(UnknownVariant::new("points kind", value)),
        }
    }
}

impl Display for PointsKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Points Entry Record
#[derive(Debug, Clone, PartialEq)]
pub struct PointsEntryRecord {
    pub uuid: PointsEntryUuid,
    pub user_uuid: UserUuid,
    /// Signed change: credits are positive, debits negative.
    pub points: i64,
    pub kind: PointsKind,
    pub deal_uuid: Option<DealUuid>,
    pub user_reward_uuid: Option<RedemptionUuid>,
    pub description: String,
    pub created_by: Option<UserUuid>,
    pub created_at: Timestamp,
}

/// Raw ledger aggregates for one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointsTotals {
    /// Approved deal credits plus positive adjustments.
    pub earned: i64,
    /// Redemption debits net of refunds, as a positive number.
    pub spent: i64,
    /// Sum of every ledger row.
    pub available: i64,
}

/// A user's balance as shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsSummary {
    pub earned: u64,
    pub spent: u64,
    pub available: u64,
    pub grand_prize_threshold: u64,
    pub grand_prize_eligible: bool,
}

impl PointsSummary {
    #[must_use]
    pub fn from_totals(totals: PointsTotals, grand_prize_threshold: u64) -> Self {
        let clamp = |value: i64| u64::try_from(value).unwrap_or(0);
        let earned = clamp(totals.earned);

        Self {
            earned,
            spent: clamp(totals.spent),
            available: clamp(totals.available),
            grand_prize_threshold,
            grand_prize_eligible: earned >= grand_prize_threshold,
        }
    }
}
