//! Rewards Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    rewards::{
        data::NewReward,
        records::{RewardRecord, RewardUuid},
    },
    rows::{to_i32, to_i64, try_get_optional_u32, try_get_timestamp, try_get_u64},
};

const CREATE_REWARD_SQL: &str = include_str!("sql/create_reward.sql");
const GET_REWARD_SQL: &str = include_str!("sql/get_reward.sql");
const GET_REWARD_FOR_UPDATE_SQL: &str = include_str!("sql/get_reward_for_update.sql");
const LIST_REWARDS_SQL: &str = include_str!("sql/list_rewards.sql");
const UPDATE_REWARD_SQL: &str = include_str!("sql/update_reward.sql");
const TAKE_STOCK_SQL: &str = include_str!("sql/take_stock.sql");
const RESTORE_STOCK_SQL: &str = include_str!("sql/restore_stock.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgRewardsRepository;

impl PgRewardsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_reward(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: RewardUuid,
        reward: NewReward,
    ) -> Result<RewardRecord, sqlx::Error> {
        query_as::<Postgres, RewardRecord>(CREATE_REWARD_SQL)
            .bind(uuid)
            .bind(reward.name)
            .bind(reward.description)
            .bind(to_i64(reward.points_cost, "points_cost")?)
            .bind(reward.category)
            .bind(reward.stock.map(|s| to_i32(s, "stock")).transpose()?)
            .bind(reward.image_url)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_reward(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reward: RewardUuid,
    ) -> Result<RewardRecord, sqlx::Error> {
        query_as::<Postgres, RewardRecord>(GET_REWARD_SQL)
            .bind(reward)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_reward_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reward: RewardUuid,
    ) -> Result<RewardRecord, sqlx::Error> {
        query_as::<Postgres, RewardRecord>(GET_REWARD_FOR_UPDATE_SQL)
            .bind(reward)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_rewards(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        include_inactive: bool,
    ) -> Result<Vec<RewardRecord>, sqlx::Error> {
        query_as::<Postgres, RewardRecord>(LIST_REWARDS_SQL)
            .bind(include_inactive)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_reward(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reward: RewardUuid,
        values: NewReward,
        is_active: bool,
    ) -> Result<RewardRecord, sqlx::Error> {
        query_as::<Postgres, RewardRecord>(UPDATE_REWARD_SQL)
            .bind(reward)
            .bind(values.name)
            .bind(values.description)
            .bind(to_i64(values.points_cost, "points_cost")?)
            .bind(values.category)
            .bind(values.stock.map(|s| to_i32(s, "stock")).transpose()?)
            .bind(values.image_url)
            .bind(is_active)
            .fetch_one(&mut **tx)
            .await
    }

    /// Take one unit of limited stock. `None` when the reward is unlimited or sold out.
    pub(crate) async fn take_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reward: RewardUuid,
    ) -> Result<Option<RewardRecord>, sqlx::Error> {
        query_as::<Postgres, RewardRecord>(TAKE_STOCK_SQL)
            .bind(reward)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Return one unit to limited stock; unlimited rewards are left untouched.
    pub(crate) async fn restore_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        reward: RewardUuid,
    ) -> Result<(), sqlx::Error> {
        query(RESTORE_STOCK_SQL)
            .bind(reward)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for RewardRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            points_cost: try_get_u64(row, "points_cost")?,
            category: row.try_get("category")?,
            stock: try_get_optional_u32(row, "stock")?,
            is_active: row.try_get("is_active")?,
            image_url: row.try_get("image_url")?,
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}
