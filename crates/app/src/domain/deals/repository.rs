//! Deals Repository

use jiff_sqlx::Date as SqlxDate;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    deals::{
        data::NewDeal,
        records::{DealRecord, DealStatus, DealUuid},
    },
    regions::Region,
    rows::{
        to_i32, to_i64, try_get_date, try_get_enum, try_get_optional_timestamp, try_get_timestamp,
        try_get_u32, try_get_u64,
    },
    users::records::UserUuid,
};

const CREATE_DEAL_SQL: &str = include_str!("sql/create_deal.sql");
const GET_DEAL_SQL: &str = include_str!("sql/get_deal.sql");
const GET_DEAL_FOR_UPDATE_SQL: &str = include_str!("sql/get_deal_for_update.sql");
const LIST_DEALS_FOR_USER_SQL: &str = include_str!("sql/list_deals_for_user.sql");
const LIST_DEALS_SQL: &str = include_str!("sql/list_deals.sql");
const UPDATE_DEAL_SQL: &str = include_str!("sql/update_deal.sql");
const APPROVE_DEAL_SQL: &str = include_str!("sql/approve_deal.sql");
const REJECT_DEAL_SQL: &str = include_str!("sql/reject_deal.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgDealsRepository;

impl PgDealsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_deal(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: DealUuid,
        owner: UserUuid,
        deal: NewDeal,
    ) -> Result<DealRecord, sqlx::Error> {
        query_as::<Postgres, DealRecord>(CREATE_DEAL_SQL)
            .bind(uuid)
            .bind(owner)
            .bind(deal.product_type.as_str())
            .bind(deal.customer_name)
            .bind(to_i64(deal.deal_value, "deal_value")?)
            .bind(to_i32(deal.quantity, "quantity")?)
            .bind(SqlxDate::from(deal.close_date))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_deal(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        deal: DealUuid,
    ) -> Result<DealRecord, sqlx::Error> {
        query_as::<Postgres, DealRecord>(GET_DEAL_SQL)
            .bind(deal)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_deal_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        deal: DealUuid,
    ) -> Result<DealRecord, sqlx::Error> {
        query_as::<Postgres, DealRecord>(GET_DEAL_FOR_UPDATE_SQL)
            .bind(deal)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_deals_for_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
    ) -> Result<Vec<DealRecord>, sqlx::Error> {
        query_as::<Postgres, DealRecord>(LIST_DEALS_FOR_USER_SQL)
            .bind(owner)
            .fetch_all(&mut **tx)
            .await
    }

    /// Deals across users, optionally limited to owners in `region`.
    pub(crate) async fn list_deals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        region: Option<&Region>,
        status: Option<DealStatus>,
    ) -> Result<Vec<DealRecord>, sqlx::Error> {
        query_as::<Postgres, DealRecord>(LIST_DEALS_SQL)
            .bind(region.map(Region::as_str))
            .bind(status.map(DealStatus::as_str))
            .fetch_all(&mut **tx)
            .await
    }

    /// Overwrite the editable fields of a pending deal.
    pub(crate) async fn update_deal(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        deal: DealUuid,
        values: NewDeal,
    ) -> Result<DealRecord, sqlx::Error> {
        query_as::<Postgres, DealRecord>(UPDATE_DEAL_SQL)
            .bind(deal)
            .bind(values.product_type.as_str())
            .bind(values.customer_name)
            .bind(to_i64(values.deal_value, "deal_value")?)
            .bind(to_i32(values.quantity, "quantity")?)
            .bind(SqlxDate::from(values.close_date))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn approve_deal(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        deal: DealUuid,
        points: u64,
        approved_by: UserUuid,
    ) -> Result<DealRecord, sqlx::Error> {
        query_as::<Postgres, DealRecord>(APPROVE_DEAL_SQL)
            .bind(deal)
            .bind(to_i64(points, "points_earned")?)
            .bind(approved_by)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn reject_deal(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        deal: DealUuid,
        rejected_by: UserUuid,
        reason: Option<&str>,
    ) -> Result<DealRecord, sqlx::Error> {
        query_as::<Postgres, DealRecord>(REJECT_DEAL_SQL)
            .bind(deal)
            .bind(rejected_by)
            .bind(reason)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for DealRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            user_uuid: row.try_get("user_uuid")?,
            product_type: try_get_enum(row, "product_type")?,
            customer_name: row.try_get("customer_name")?,
            deal_value: try_get_u64(row, "deal_value")?,
            quantity: try_get_u32(row, "quantity")?,
            close_date: try_get_date(row, "close_date")?,
            status: try_get_enum(row, "status")?,
            points_earned: try_get_u64(row, "points_earned")?,
            approved_by: row.try_get("approved_by")?,
            approved_at: try_get_optional_timestamp(row, "approved_at")?,
            rejection_reason: row.try_get("rejection_reason")?,
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}
