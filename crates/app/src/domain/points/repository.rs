//! Points Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::{
    points::{
        data::NewPointsEntry,
        records::{PointsEntryRecord, PointsEntryUuid, PointsTotals},
    },
    rows::{try_get_enum, try_get_timestamp},
    users::records::UserUuid,
};

const INSERT_ENTRY_SQL: &str = include_str!("sql/insert_entry.sql");
const LIST_HISTORY_SQL: &str = include_str!("sql/list_history.sql");
const BALANCE_TOTALS_SQL: &str = include_str!("sql/balance_totals.sql");
const AVAILABLE_BALANCE_SQL: &str = include_str!("sql/available_balance.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPointsRepository;

impl PgPointsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn insert_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: NewPointsEntry,
    ) -> Result<PointsEntryRecord, sqlx::Error> {
        query_as::<Postgres, PointsEntryRecord>(INSERT_ENTRY_SQL)
            .bind(PointsEntryUuid::new())
            .bind(entry.user_uuid)
            .bind(entry.points)
            .bind(entry.kind.as_str())
            .bind(entry.deal_uuid)
            .bind(entry.user_reward_uuid)
            .bind(entry.description)
            .bind(entry.created_by)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_history(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<PointsEntryRecord>, sqlx::Error> {
        query_as::<Postgres, PointsEntryRecord>(LIST_HISTORY_SQL)
            .bind(user)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn balance_totals(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<PointsTotals, sqlx::Error> {
        let row = query(BALANCE_TOTALS_SQL)
            .bind(user)
            .fetch_one(&mut **tx)
            .await?;

        Ok(PointsTotals {
            earned: row.try_get("earned")?,
            spent: row.try_get("spent")?,
            available: row.try_get("available")?,
        })
    }

    /// Current balance. Callers lock the user row first when they are about to debit.
    pub(crate) async fn available_balance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<i64, sqlx::Error> {
        query_scalar(AVAILABLE_BALANCE_SQL)
            .bind(user)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for PointsEntryRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            user_uuid: row.try_get("user_uuid")?,
            points: row.try_get("points")?,
            kind: try_get_enum(row, "kind")?,
            deal_uuid: row.try_get("deal_uuid")?,
            user_reward_uuid: row.try_get("user_reward_uuid")?,
            description: row.try_get("description")?,
            created_by: row.try_get("created_by")?,
            created_at: try_get_timestamp(row, "created_at")?,
        })
    }
}
