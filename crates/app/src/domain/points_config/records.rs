//! Points Config Records

use jiff::Timestamp;

use crate::domain::{
    deals::records::ProductType, regions::Region, users::records::UserUuid,
};

/// Default cents of deal value per point, for every product type.
pub const DEFAULT_CENTS_PER_POINT: u64 = 100;

/// Default points a user must earn to qualify for the grand prize.
pub const DEFAULT_GRAND_PRIZE_THRESHOLD: u64 = 10_000;

/// Conversion rates from deal value to points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsRates {
    pub software_cents_per_point: u64,
    pub hardware_cents_per_point: u64,
    pub equipment_cents_per_point: u64,
}

impl Default for PointsRates {
    fn default() -> Self {
        Self {
            software_cents_per_point: DEFAULT_CENTS_PER_POINT,
            hardware_cents_per_point: DEFAULT_CENTS_PER_POINT,
            equipment_cents_per_point: DEFAULT_CENTS_PER_POINT,
        }
    }
}

impl PointsRates {
    #[must_use]
    pub const fn cents_per_point(&self, product_type: ProductType) -> u64 {
        match product_type {
            ProductType::Software => self.software_cents_per_point,
            ProductType::Hardware => self.hardware_cents_per_point,
            ProductType::Equipment => self.equipment_cents_per_point,
        }
    }

    /// Whole points earned by a deal, rounding down.
    #[must_use]
    pub fn points_for(&self, product_type: ProductType, deal_value_cents: u64) -> u64 {
        deal_value_cents
            .checked_div(self.cents_per_point(product_type))
            .unwrap_or(0)
    }
}

/// Points Config Record
#[derive(Debug, Clone, PartialEq)]
pub struct PointsConfigRecord {
    pub region: Region,
    pub rates: PointsRates,
    pub grand_prize_threshold: u64,
    pub redemption_starts_at: Option<Timestamp>,
    pub redemption_ends_at: Option<Timestamp>,
    pub updated_by: Option<UserUuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PointsConfigRecord {
    /// Whether redemptions are accepted at `now`. Missing bounds are open-ended.
    #[must_use]
    pub fn redemption_open_at(&self, now: Timestamp) -> bool {
        self.redemption_starts_at.is_none_or(|start| start <= now)
            && self.redemption_ends_at.is_none_or(|end| now < end)
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;

    use super::*;

    #[test]
    fn points_round_down() {
        let rates = PointsRates {
            software_cents_per_point: 100,
            hardware_cents_per_point: 250,
            equipment_cents_per_point: 1_000,
        };

        assert_eq!(rates.points_for(ProductType::Software, 12_399), 123);
        assert_eq!(rates.points_for(ProductType::Hardware, 12_399), 49);
        assert_eq!(rates.points_for(ProductType::Equipment, 999), 0);
    }

    #[test]
    fn zero_rate_earns_nothing() {
        let rates = PointsRates {
            software_cents_per_point: 0,
            ..PointsRates::default()
        };

        assert_eq!(rates.points_for(ProductType::Software, 50_000), 0);
    }

    #[test]
    fn defaults_are_one_point_per_dollar() {
        let rates = PointsRates::default();

        assert_eq!(rates.points_for(ProductType::Hardware, 10_000), 100);
    }

    #[test]
    fn redemption_window_bounds() -> testresult::TestResult {
        let now = Timestamp::now();
        let config = PointsConfigRecord {
            region: Region::parse("north")?,
            rates: PointsRates::default(),
            grand_prize_threshold: DEFAULT_GRAND_PRIZE_THRESHOLD,
            redemption_starts_at: Some(now - SignedDuration::from_hours(1)),
            redemption_ends_at: Some(now + SignedDuration::from_hours(1)),
            updated_by: None,
            created_at: now,
            updated_at: now,
        };

        assert!(config.redemption_open_at(now));
        assert!(!config.redemption_open_at(now + SignedDuration::from_hours(2)));
        assert!(!config.redemption_open_at(now - SignedDuration::from_hours(2)));

        let unbounded = PointsConfigRecord {
            redemption_starts_at: None,
            redemption_ends_at: None,
            ..config
        };

        assert!(unbounded.redemption_open_at(now + SignedDuration::from_hours(1_000)));

        Ok(())
    }
}
