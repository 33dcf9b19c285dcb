//! Points Config Data

use jiff::Timestamp;

use crate::domain::{
    MAX_STORED_AMOUNT,
    points_config::{
        errors::PointsConfigServiceError,
        records::{DEFAULT_GRAND_PRIZE_THRESHOLD, PointsConfigRecord, PointsRates},
    },
};

/// Partial update of a region's configuration. Absent fields keep their current
/// value; the window fields use `Some(None)` to clear a bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointsConfigUpdate {
    pub software_cents_per_point: Option<u64>,
    pub hardware_cents_per_point: Option<u64>,
    pub equipment_cents_per_point: Option<u64>,
    pub grand_prize_threshold: Option<u64>,
    pub redemption_starts_at: Option<Option<Timestamp>>,
    pub redemption_ends_at: Option<Option<Timestamp>>,
}

/// Complete set of values to store for a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ResolvedPointsConfig {
    pub rates: PointsRates,
    pub grand_prize_threshold: u64,
    pub redemption_starts_at: Option<Timestamp>,
    pub redemption_ends_at: Option<Timestamp>,
}

impl PointsConfigUpdate {
    /// Merge this patch over the stored row (or the defaults for a new region) and validate.
    pub(crate) fn resolve(
        self,
        current: Option<&PointsConfigRecord>,
    ) -> Result<ResolvedPointsConfig, PointsConfigServiceError> {
        let rates = current.map(|c| c.rates).unwrap_or_default();

        let resolved = ResolvedPointsConfig {
            rates: PointsRates {
                software_cents_per_point: self
                    .software_cents_per_point
                    .unwrap_or(rates.software_cents_per_point),
                hardware_cents_per_point: self
                    .hardware_cents_per_point
                    .unwrap_or(rates.hardware_cents_per_point),
                equipment_cents_per_point: self
                    .equipment_cents_per_point
                    .unwrap_or(rates.equipment_cents_per_point),
            },
            grand_prize_threshold: self.grand_prize_threshold.unwrap_or_else(|| {
                current.map_or(DEFAULT_GRAND_PRIZE_THRESHOLD, |c| c.grand_prize_threshold)
            }),
            redemption_starts_at: self
                .redemption_starts_at
                .unwrap_or_else(|| current.and_then(|c| c.redemption_starts_at)),
            redemption_ends_at: self
                .redemption_ends_at
                .unwrap_or_else(|| current.and_then(|c| c.redemption_ends_at)),
        };

        let rates = resolved.rates;

        let amounts = [
            rates.software_cents_per_point,
            rates.hardware_cents_per_point,
            rates.equipment_cents_per_point,
        ];

        if amounts.iter().any(|&rate| rate == 0 || rate > MAX_STORED_AMOUNT)
            || resolved.grand_prize_threshold > MAX_STORED_AMOUNT
        {
            return Err(PointsConfigServiceError::InvalidData);
        }

        if let (Some(start), Some(end)) = (resolved.redemption_starts_at, resolved.redemption_ends_at)
            && start >= end
        {
            return Err(PointsConfigServiceError::InvalidData);
        }

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use testresult::TestResult;

    use super::*;
    use crate::domain::regions::Region;

    fn stored() -> TestResult<PointsConfigRecord> {
        let now = Timestamp::now();

        Ok(PointsConfigRecord {
            region: Region::parse("north")?,
            rates: PointsRates {
                software_cents_per_point: 50,
                hardware_cents_per_point: 200,
                equipment_cents_per_point: 400,
            },
            grand_prize_threshold: 5_000,
            redemption_starts_at: Some(now),
            redemption_ends_at: None,
            updated_by: None,
            created_at: now,
            updated_at: now,
        })
    }

    #[test]
    fn new_regions_start_from_defaults() -> TestResult {
        let resolved = PointsConfigUpdate {
            hardware_cents_per_point: Some(250),
            ..PointsConfigUpdate::default()
        }
        .resolve(None)?;

        assert_eq!(resolved.rates.software_cents_per_point, 100);
        assert_eq!(resolved.rates.hardware_cents_per_point, 250);
        assert_eq!(resolved.grand_prize_threshold, DEFAULT_GRAND_PRIZE_THRESHOLD);
        assert_eq!(resolved.redemption_starts_at, None);

        Ok(())
    }

    #[test]
    fn absent_fields_keep_stored_values() -> TestResult {
        let current = stored()?;

        let resolved = PointsConfigUpdate {
            grand_prize_threshold: Some(7_500),
            ..PointsConfigUpdate::default()
        }
        .resolve(Some(&current))?;

        assert_eq!(resolved.rates, current.rates);
        assert_eq!(resolved.grand_prize_threshold, 7_500);
        assert_eq!(resolved.redemption_starts_at, current.redemption_starts_at);

        Ok(())
    }

    #[test]
    fn window_bounds_can_be_cleared() -> TestResult {
        let current = stored()?;

        let resolved = PointsConfigUpdate {
            redemption_starts_at: Some(None),
            ..PointsConfigUpdate::default()
        }
        .resolve(Some(&current))?;

        assert_eq!(resolved.redemption_starts_at, None);

        Ok(())
    }

    #[test]
    fn zero_rates_are_invalid() {
        let result = PointsConfigUpdate {
            equipment_cents_per_point: Some(0),
            ..PointsConfigUpdate::default()
        }
        .resolve(None);

        assert!(matches!(result, Err(PointsConfigServiceError::InvalidData)));
    }

    #[test]
    fn window_must_start_before_it_ends() {
        let now = Timestamp::now();

        let result = PointsConfigUpdate {
            redemption_starts_at: Some(Some(now)),
            redemption_ends_at: Some(Some(now - SignedDuration::from_hours(1))),
            ..PointsConfigUpdate::default()
        }
        .resolve(None);

        assert!(matches!(result, Err(PointsConfigServiceError::InvalidData)));
    }

    #[test]
    fn rates_and_threshold_must_fit_their_columns() {
        let oversized_rate = PointsConfigUpdate {
            software_cents_per_point: Some(MAX_STORED_AMOUNT + 1),
            ..PointsConfigUpdate::default()
        }
        .resolve(None);
        let oversized_threshold = PointsConfigUpdate {
            grand_prize_threshold: Some(u64::MAX),
            ..PointsConfigUpdate::default()
        }
        .resolve(None);

        assert!(matches!(oversized_rate, Err(PointsConfigServiceError::InvalidData)));
        assert!(matches!(
            oversized_threshold,
            Err(PointsConfigServiceError::InvalidData)
        ));
    }
}
