//! Report response bodies.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use loyalty_app::domain::reports::records::{
    DealTally, RedemptionTally, RegionBreakdown, ReportSummary, UserCounts,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UserCountsResponse {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
}

impl From<UserCounts> for UserCountsResponse {
    fn from(counts: UserCounts) -> Self {
        UserCountsResponse {
            total: counts.total(),
            pending: counts.pending,
            approved: counts.approved,
            rejected: counts.rejected,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DealTallyResponse {
    pub status: String,
    pub count: u64,

    /// Cents
    pub total_value: u64,
}

impl From<DealTally> for DealTallyResponse {
    fn from(tally: DealTally) -> Self {
        DealTallyResponse {
            status: tally.status.as_str().to_string(),
            count: tally.count,
            total_value: tally.total_value,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RedemptionTallyResponse {
    pub status: String,
    pub count: u64,
}

impl From<RedemptionTally> for RedemptionTallyResponse {
    fn from(tally: RedemptionTally) -> Self {
        RedemptionTallyResponse {
            status: tally.status.as_str().to_string(),
            count: tally.count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RegionBreakdownResponse {
    /// `null` groups users without a region
    pub region: Option<String>,
    pub users: u64,
    pub approved_deals: u64,
    pub approved_deal_value: u64,
    pub points_awarded: u64,
}

impl From<RegionBreakdown> for RegionBreakdownResponse {
    fn from(breakdown: RegionBreakdown) -> Self {
        RegionBreakdownResponse {
            region: breakdown.region.map(Into::into),
            users: breakdown.users,
            approved_deals: breakdown.approved_deals,
            approved_deal_value: breakdown.approved_deal_value,
            points_awarded: breakdown.points_awarded,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReportSummaryResponse {
    pub users: UserCountsResponse,
    pub deals: Vec<DealTallyResponse>,
    pub points_awarded: u64,
    pub points_spent: u64,
    pub redemptions: Vec<RedemptionTallyResponse>,
    pub open_tickets: u64,
    pub regions: Vec<RegionBreakdownResponse>,
}

impl From<ReportSummary> for ReportSummaryResponse {
    fn from(summary: ReportSummary) -> Self {
        ReportSummaryResponse {
            users: summary.users.into(),
            deals: summary.deals.into_iter().map(Into::into).collect(),
            points_awarded: summary.points_awarded,
            points_spent: summary.points_spent,
            redemptions: summary.redemptions.into_iter().map(Into::into).collect(),
            open_tickets: summary.open_tickets,
            regions: summary.regions.into_iter().map(Into::into).collect(),
        }
    }
}
