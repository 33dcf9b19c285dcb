//! Redemption Data

use crate::domain::redemptions::records::RedemptionStatus;

/// Admin status change, with an optional carrier tracking number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedemptionStatusUpdate {
    pub status: RedemptionStatus,
    pub tracking_number: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RedemptionFilter {
    pub status: Option<RedemptionStatus>,
}
