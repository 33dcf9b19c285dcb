//! Points Config Handlers

pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update;

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use loyalty_app::domain::{
        points_config::records::{PointsConfigRecord, PointsRates},
        regions::Region,
    };

    pub(super) fn make_config(region: Region) -> PointsConfigRecord {
        PointsConfigRecord {
            region,
            rates: PointsRates {
                software_cents_per_point: 500,
                hardware_cents_per_point: 1_000,
                equipment_cents_per_point: 2_000,
            },
            grand_prize_threshold: 10_000,
            redemption_starts_at: None,
            redemption_ends_at: None,
            updated_by: None,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }
}
