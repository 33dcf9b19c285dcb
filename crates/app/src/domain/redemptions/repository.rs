//! Redemptions Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    redemptions::records::{RedemptionRecord, RedemptionStatus, RedemptionUuid},
    regions::Region,
    rewards::records::RewardUuid,
    rows::{to_i64, try_get_enum, try_get_optional_timestamp, try_get_timestamp, try_get_u64},
    users::records::UserUuid,
};

const CREATE_REDEMPTION_SQL: &str = include_str!("sql/create_redemption.sql");
const GET_REDEMPTION_FOR_UPDATE_SQL: &str = include_str!("sql/get_redemption_for_update.sql");
const LIST_REDEMPTIONS_FOR_USER_SQL: &str = include_str!("sql/list_redemptions_for_user.sql");
const LIST_REDEMPTIONS_SQL: &str = include_str!("sql/list_redemptions.sql");
const UPDATE_STATUS_SQL: &str = include_str!("sql/update_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgRedemptionsRepository;

impl PgRedemptionsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_redemption(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        reward: RewardUuid,
        points_spent: u64,
        shipping_address: Option<&str>,
    ) -> Result<RedemptionRecord, sqlx::Error> {
        query_as::<Postgres, RedemptionRecord>(CREATE_REDEMPTION_SQL)
            .bind(RedemptionUuid::new())
            .bind(user)
            .bind(reward)
            .bind(to_i64(points_spent, "points_spent")?)
            .bind(shipping_address)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_redemption_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        redemption: RedemptionUuid,
    ) -> Result<RedemptionRecord, sqlx::Error> {
        query_as::<Postgres, RedemptionRecord>(GET_REDEMPTION_FOR_UPDATE_SQL)
            .bind(redemption)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_redemptions_for_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<RedemptionRecord>, sqlx::Error> {
        query_as::<Postgres, RedemptionRecord>(LIST_REDEMPTIONS_FOR_USER_SQL)
            .bind(user)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_redemptions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        region: Option<&Region>,
        status: Option<RedemptionStatus>,
    ) -> Result<Vec<RedemptionRecord>, sqlx::Error> {
        query_as::<Postgres, RedemptionRecord>(LIST_REDEMPTIONS_SQL)
            .bind(region.map(Region::as_str))
            .bind(status.map(RedemptionStatus::as_str))
            .fetch_all(&mut **tx)
            .await
    }

    /// Move to `status`, stamping the matching timestamp and reviewer.
    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        redemption: RedemptionUuid,
        status: RedemptionStatus,
        tracking_number: Option<&str>,
        actor: UserUuid,
    ) -> Result<RedemptionRecord, sqlx::Error> {
        query_as::<Postgres, RedemptionRecord>(UPDATE_STATUS_SQL)
            .bind(redemption)
            .bind(status.as_str())
            .bind(tracking_number)
            .bind(actor)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for RedemptionRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            user_uuid: row.try_get("user_uuid")?,
            reward_uuid: row.try_get("reward_uuid")?,
            points_spent: try_get_u64(row, "points_spent")?,
            status: try_get_enum(row, "status")?,
            shipping_address: row.try_get("shipping_address")?,
            tracking_number: row.try_get("tracking_number")?,
            approved_by: row.try_get("approved_by")?,
            approved_at: try_get_optional_timestamp(row, "approved_at")?,
            shipped_at: try_get_optional_timestamp(row, "shipped_at")?,
            delivered_at: try_get_optional_timestamp(row, "delivered_at")?,
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}
