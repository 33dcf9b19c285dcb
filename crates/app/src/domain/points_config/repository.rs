//! Points Config Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    points_config::{
        data::ResolvedPointsConfig,
        records::{PointsConfigRecord, PointsRates},
    },
    regions::Region,
    rows::{to_i64, try_get_optional_timestamp, try_get_timestamp, try_get_u64},
    users::records::UserUuid,
};

const GET_CONFIG_SQL: &str = include_str!("sql/get_config.sql");
const GET_CONFIG_FOR_UPDATE_SQL: &str = include_str!("sql/get_config_for_update.sql");
const LIST_CONFIGS_SQL: &str = include_str!("sql/list_configs.sql");
const UPSERT_CONFIG_SQL: &str = include_str!("sql/upsert_config.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPointsConfigRepository;

impl PgPointsConfigRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_config(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        region: &Region,
    ) -> Result<Option<PointsConfigRecord>, sqlx::Error> {
        query_as::<Postgres, PointsConfigRecord>(GET_CONFIG_SQL)
            .bind(region.as_str())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Rates for `region`, shared by the config service and deal approval.
    pub(crate) async fn rates_for(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        region: &Region,
    ) -> Result<Option<PointsRates>, sqlx::Error> {
        Ok(self
            .get_config(tx, region)
            .await?
            .map(|config| config.rates))
    }

    pub(crate) async fn get_config_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        region: &Region,
    ) -> Result<Option<PointsConfigRecord>, sqlx::Error> {
        query_as::<Postgres, PointsConfigRecord>(GET_CONFIG_FOR_UPDATE_SQL)
            .bind(region.as_str())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_configs(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<PointsConfigRecord>, sqlx::Error> {
        query_as::<Postgres, PointsConfigRecord>(LIST_CONFIGS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn upsert_config(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        region: &Region,
        config: ResolvedPointsConfig,
        updated_by: UserUuid,
    ) -> Result<PointsConfigRecord, sqlx::Error> {
        query_as::<Postgres, PointsConfigRecord>(UPSERT_CONFIG_SQL)
            .bind(region.as_str())
            .bind(to_i64(
                config.rates.software_cents_per_point,
                "software_cents_per_point",
            )?)
            .bind(to_i64(
                config.rates.hardware_cents_per_point,
                "hardware_cents_per_point",
            )?)
            .bind(to_i64(
                config.rates.equipment_cents_per_point,
                "equipment_cents_per_point",
            )?)
            .bind(to_i64(config.grand_prize_threshold, "grand_prize_threshold")?)
            .bind(config.redemption_starts_at.map(SqlxTimestamp::from))
            .bind(config.redemption_ends_at.map(SqlxTimestamp::from))
            .bind(updated_by)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for PointsConfigRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            region: row.try_get("region")?,
            rates: PointsRates {
                software_cents_per_point: try_get_u64(row, "software_cents_per_point")?,
                hardware_cents_per_point: try_get_u64(row, "hardware_cents_per_point")?,
                equipment_cents_per_point: try_get_u64(row, "equipment_cents_per_point")?,
            },
            grand_prize_threshold: try_get_u64(row, "grand_prize_threshold")?,
            redemption_starts_at: try_get_optional_timestamp(row, "redemption_starts_at")?,
            redemption_ends_at: try_get_optional_timestamp(row, "redemption_ends_at")?,
            updated_by: row.try_get("updated_by")?,
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}
