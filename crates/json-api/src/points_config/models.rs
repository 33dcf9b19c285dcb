//! Points config request and response bodies.

use std::string::ToString;

use jiff::Timestamp;
use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use loyalty_app::domain::{
    points_config::{data::PointsConfigUpdate, records::PointsConfigRecord},
    regions::Region,
};

use crate::extensions::*;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PointsConfigResponse {
    pub region: String,
    pub software_cents_per_point: u64,
    pub hardware_cents_per_point: u64,
    pub equipment_cents_per_point: u64,
    pub grand_prize_threshold: u64,
    pub redemption_starts_at: Option<String>,
    pub redemption_ends_at: Option<String>,
    pub updated_by: Option<Uuid>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<PointsConfigRecord> for PointsConfigResponse {
    fn from(config: PointsConfigRecord) -> Self {
        PointsConfigResponse {
            region: config.region.into(),
            software_cents_per_point: config.rates.software_cents_per_point,
            hardware_cents_per_point: config.rates.hardware_cents_per_point,
            equipment_cents_per_point: config.rates.equipment_cents_per_point,
            grand_prize_threshold: config.grand_prize_threshold,
            redemption_starts_at: config.redemption_starts_at.as_ref().map(ToString::to_string),
            redemption_ends_at: config.redemption_ends_at.as_ref().map(ToString::to_string),
            updated_by: config.updated_by.map(Into::into),
            created_at: config.created_at.to_string(),
            updated_at: config.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PointsConfigsResponse {
    pub configs: Vec<PointsConfigResponse>,
}

/// Fields to change. `null` clears a redemption window bound.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdatePointsConfigRequest {
    pub software_cents_per_point: Option<u64>,
    pub hardware_cents_per_point: Option<u64>,
    pub equipment_cents_per_point: Option<u64>,
    pub grand_prize_threshold: Option<u64>,

    /// RFC 3339 timestamp
    #[serde(default, deserialize_with = "crate::nullable::deserialize")]
    #[salvo(schema(value_type = Option<String>))]
    pub redemption_starts_at: Option<Option<String>>,

    /// RFC 3339 timestamp
    #[serde(default, deserialize_with = "crate::nullable::deserialize")]
    #[salvo(schema(value_type = Option<String>))]
    pub redemption_ends_at: Option<Option<String>>,
}

impl UpdatePointsConfigRequest {
    pub(crate) fn into_update(self) -> Result<PointsConfigUpdate, StatusError> {
        Ok(PointsConfigUpdate {
            software_cents_per_point: self.software_cents_per_point,
            hardware_cents_per_point: self.hardware_cents_per_point,
            equipment_cents_per_point: self.equipment_cents_per_point,
            grand_prize_threshold: self.grand_prize_threshold,
            redemption_starts_at: parse_bound(self.redemption_starts_at)
                .or_400("invalid redemption_starts_at")?,
            redemption_ends_at: parse_bound(self.redemption_ends_at)
                .or_400("invalid redemption_ends_at")?,
        })
    }
}

fn parse_bound(value: Option<Option<String>>) -> Result<Option<Option<Timestamp>>, jiff::Error> {
    value
        .map(|bound| bound.as_deref().map(str::parse::<Timestamp>).transpose())
        .transpose()
}

pub(crate) fn parse_region(value: &str) -> Result<Region, StatusError> {
    Region::parse(value).or_400("invalid region")
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn window_bounds_keep_clear_or_set() -> TestResult {
        let update = UpdatePointsConfigRequest {
            redemption_starts_at: Some(Some("2026-01-01T00:00:00Z".to_string())),
            redemption_ends_at: Some(None),
            ..UpdatePointsConfigRequest::default()
        }
        .into_update()?;

        assert_eq!(
            update.redemption_starts_at,
            Some(Some("2026-01-01T00:00:00Z".parse()?))
        );
        assert_eq!(update.redemption_ends_at, Some(None));
        assert_eq!(update.software_cents_per_point, None);

        Ok(())
    }

    #[test]
    fn malformed_bounds_are_rejected() {
        let update = UpdatePointsConfigRequest {
            redemption_ends_at: Some(Some("next tuesday".to_string())),
            ..UpdatePointsConfigRequest::default()
        }
        .into_update();

        assert!(update.is_err(), "bounds must be RFC 3339");
    }
}
