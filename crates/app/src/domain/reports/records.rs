//! Report Records

use crate::domain::{
    deals::records::DealStatus, redemptions::records::RedemptionStatus, regions::Region,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserCounts {
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
}

impl UserCounts {
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.pending + self.approved + self.rejected
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DealTally {
    pub status: DealStatus,
    pub count: u64,
    /// Sum of deal values in cents.
    pub total_value: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedemptionTally {
    pub status: RedemptionStatus,
    pub count: u64,
}

/// Approved activity for one region. `region` is `None` for users without one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionBreakdown {
    pub region: Option<Region>,
    pub users: u64,
    pub approved_deals: u64,
    pub approved_deal_value: u64,
    pub points_awarded: u64,
}

/// Scalar totals read in one round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct Overview {
    pub users: UserCounts,
    pub points_awarded: u64,
    pub points_spent: u64,
    pub open_tickets: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub users: UserCounts,
    pub deals: Vec<DealTally>,
    pub points_awarded: u64,
    pub points_spent: u64,
    pub redemptions: Vec<RedemptionTally>,
    pub open_tickets: u64,
    pub regions: Vec<RegionBreakdown>,
}
