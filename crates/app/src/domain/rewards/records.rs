//! Reward Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Reward UUID
pub type RewardUuid = TypedUuid<RewardRecord>;

/// Reward Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardRecord {
    pub uuid: RewardUuid,
    pub name: String,
    pub description: String,
    pub points_cost: u64,
    pub category: String,
    /// Remaining units; `None` is unlimited.
    pub stock: Option<u32>,
    pub is_active: bool,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl RewardRecord {
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock.is_none_or(|stock| stock > 0)
    }

    /// Whether a user may redeem this reward right now, ignoring balance and window.
    #[must_use]
    pub fn is_redeemable(&self) -> bool {
        self.is_active && self.in_stock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reward(stock: Option<u32>, is_active: bool) -> RewardRecord {
        let now = Timestamp::now();

        RewardRecord {
            uuid: RewardUuid::new(),
            name: "Headphones".to_string(),
            description: String::new(),
            points_cost: 500,
            category: "electronics".to_string(),
            stock,
            is_active,
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn unlimited_stock_is_always_available() {
        assert!(reward(None, true).is_redeemable());
    }

    #[test]
    fn empty_stock_is_not_redeemable() {
        assert!(!reward(Some(0), true).is_redeemable());
        assert!(reward(Some(1), true).is_redeemable());
    }

    #[test]
    fn inactive_rewards_are_not_redeemable() {
        assert!(!reward(Some(10), false).is_redeemable());
    }
}
