//! Deal Records

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::{Timestamp, civil::Date};

use crate::{
    domain::{UnknownVariant, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Deal UUID
pub type DealUuid = TypedUuid<DealRecord>;

/// Product line a deal was closed in; each has its own points rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductType {
    Software,
    Hardware,
    Equipment,
}

impl ProductType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Software => "software",
            Self::Hardware => "hardware",
            Self::Equipment => "equipment",
        }
    }
}

impl FromStr for ProductType {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "software" => Ok(Self::Software),
            "hardware" => Ok(Self::Hardware),
            "equipment" => Ok(Self::Equipment),
            _ => Err(UnknownVariant::new("product type", value)),
        }
    }
}

impl Display for ProductType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DealStatus {
    Pending,
    Approved,
    Rejected,
}

impl DealStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Only pending deals can be decided or edited.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl FromStr for DealStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(UnknownVariant::new("deal status", value)),
        }
    }
}

impl Display for DealStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Deal Record
#[derive(Debug, Clone, PartialEq)]
pub struct DealRecord {
    pub uuid: DealUuid,
    pub user_uuid: UserUuid,
    pub product_type: ProductType,
    pub customer_name: String,
    /// Deal value in cents.
    pub deal_value: u64,
    pub quantity: u32,
    pub close_date: Date,
    pub status: DealStatus,
    /// Always 0 unless `status` is approved.
    pub points_earned: u64,
    pub approved_by: Option<UserUuid>,
    pub approved_at: Option<Timestamp>,
    pub rejection_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_types_parse() {
        assert_eq!("hardware".parse::<ProductType>(), Ok(ProductType::Hardware));
        assert!("services".parse::<ProductType>().is_err());
    }

    #[test]
    fn only_pending_deals_are_open() {
        assert!(DealStatus::Pending.is_pending());
        assert!(!DealStatus::Approved.is_pending());
        assert!(!DealStatus::Rejected.is_pending());
    }
}
