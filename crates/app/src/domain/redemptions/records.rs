//! Redemption Records

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::Timestamp;
use smallvec::{SmallVec, smallvec};

use crate::{
    domain::{UnknownVariant, rewards::records::RewardUuid, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Redemption UUID
pub type RedemptionUuid = TypedUuid<RedemptionRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedemptionStatus {
    Pending,
    Approved,
    Rejected,
    Shipped,
    Delivered,
}

impl RedemptionStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
        }
    }

    /// Statuses reachable from this one.
    #[must_use]
    pub fn next_statuses(self) -> SmallVec<[Self; 3]> {
        match self {
            Self::Pending => smallvec![Self::Approved, Self::Rejected, Self::Shipped],
            Self::Approved => smallvec![Self::Shipped, Self::Rejected],
            Self::Shipped => smallvec![Self::Delivered],
            Self::Rejected | Self::Delivered => SmallVec::new(),
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.next_statuses().contains(&next)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Delivered)
    }
}

impl FromStr for RedemptionStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            _ => Err(UnknownVariant::new("redemption status", value)),
        }
    }
}

impl Display for RedemptionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Redemption Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedemptionRecord {
    pub uuid: RedemptionUuid,
    pub user_uuid: UserUuid,
    pub reward_uuid: RewardUuid,
    pub points_spent: u64,
    pub status: RedemptionStatus,
    pub shipping_address: Option<String>,
    pub tracking_number: Option<String>,
    pub approved_by: Option<UserUuid>,
    pub approved_at: Option<Timestamp>,
    pub shipped_at: Option<Timestamp>,
    pub delivered_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
