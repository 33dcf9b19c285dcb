//! Rewards service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    auth::Principal,
    database::Db,
    domain::{
        rewards::{
            data::{NewReward, RewardUpdate},
            errors::RewardsServiceError,
            records::{RewardRecord, RewardUuid},
            repository::PgRewardsRepository,
        },
        users::records::Role,
    },
};

#[derive(Debug, Clone)]
pub struct PgRewardsService {
    db: Db,
    repository: PgRewardsRepository,
}

impl PgRewardsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgRewardsRepository::new(),
        }
    }
}

#[async_trait]
impl RewardsService for PgRewardsService {
    async fn list_rewards(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<RewardRecord>, RewardsServiceError> {
        let mut tx = self.db.begin().await?;

        let rewards = self.repository.list_rewards(&mut tx, include_inactive).await?;

        tx.commit().await?;

        Ok(rewards)
    }

    async fn get_reward(&self, reward: RewardUuid) -> Result<RewardRecord, RewardsServiceError> {
        let mut tx = self.db.begin().await?;

        let found = self.repository.get_reward(&mut tx, reward).await?;

        tx.commit().await?;

        Ok(found)
    }

    #[tracing::instrument(name = "rewards.service.create_reward", skip(self, actor, reward), fields(actor = %actor.user_uuid), err)]
    async fn create_reward(
        &self,
        actor: &Principal,
        reward: NewReward,
    ) -> Result<RewardRecord, RewardsServiceError> {
        actor.require_role(Role::Admin)?;

        let reward = reward.normalised()?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_reward(&mut tx, RewardUuid::new(), reward)
            .await?;

        tx.commit().await?;

        info!(reward_uuid = %created.uuid, name = %created.name, "reward created");

        Ok(created)
    }

    #[tracing::instrument(name = "rewards.service.update_reward", skip(self, actor, update), fields(actor = %actor.user_uuid), err)]
    async fn update_reward(
        &self,
        actor: &Principal,
        reward: RewardUuid,
        update: RewardUpdate,
    ) -> Result<RewardRecord, RewardsServiceError> {
        actor.require_role(Role::Admin)?;

        let mut tx = self.db.begin().await?;

        let existing = self.repository.get_reward_for_update(&mut tx, reward).await?;

        let (values, is_active) = update.apply(&existing)?;

        let updated = self
            .repository
            .update_reward(&mut tx, reward, values, is_active)
            .await?;

        tx.commit().await?;

        info!(reward_uuid = %updated.uuid, is_active = updated.is_active, "reward updated");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait RewardsService: Send + Sync {
    /// Catalog listing, cheapest first. Inactive rewards only when asked for.
    async fn list_rewards(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<RewardRecord>, RewardsServiceError>;

    async fn get_reward(&self, reward: RewardUuid) -> Result<RewardRecord, RewardsServiceError>;

    async fn create_reward(
        &self,
        actor: &Principal,
        reward: NewReward,
    ) -> Result<RewardRecord, RewardsServiceError>;

    /// Patch a reward. Rewards are retired with `is_active = false`, never deleted.
    async fn update_reward(
        &self,
        actor: &Principal,
        reward: RewardUuid,
        update: RewardUpdate,
    ) -> Result<RewardRecord, RewardsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::test::TestContext;

    fn gift_card(points_cost: u64, stock: Option<u32>) -> NewReward {
        NewReward {
            name: "Gift Card".to_string(),
            description: "Redeemable online".to_string(),
            points_cost,
            category: "gift-cards".to_string(),
            stock,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn admins_create_rewards() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.admin(Role::Admin, None).await?;

        let created = ctx
            .rewards
            .create_reward(&admin, gift_card(500, Some(5)))
            .await?;

        assert!(created.is_active);
        assert_eq!(created.stock, Some(5));
        assert_eq!(ctx.rewards.get_reward(created.uuid).await?, created);

        Ok(())
    }

    #[tokio::test]
    async fn regional_admins_cannot_create_rewards() -> TestResult {
        let ctx = TestContext::new().await;
        let regional = ctx.admin(Role::RegionalAdmin, Some("north")).await?;

        let result = ctx
            .rewards
            .create_reward(&regional, gift_card(500, None))
            .await;

        assert!(matches!(result, Err(RewardsServiceError::Forbidden)));

        Ok(())
    }

    #[tokio::test]
    async fn deactivated_rewards_are_hidden_by_default() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.admin(Role::Admin, None).await?;

        let cheap = ctx
            .rewards
            .create_reward(&admin, gift_card(100, None))
            .await?;
        let retired = ctx
            .rewards
            .create_reward(&admin, gift_card(200, None))
            .await?;

        ctx.rewards
            .update_reward(
                &admin,
                retired.uuid,
                RewardUpdate {
                    is_active: Some(false),
                    ..RewardUpdate::default()
                },
            )
            .await?;

        let active = ctx.rewards.list_rewards(false).await?;
        let all = ctx.rewards.list_rewards(true).await?;

        assert_eq!(
            active.iter().map(|r| r.uuid).collect::<Vec<_>>(),
            vec![cheap.uuid]
        );
        assert_eq!(all.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_reward_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx.rewards.get_reward(RewardUuid::new()).await;

        assert!(matches!(result, Err(RewardsServiceError::NotFound)));

        Ok(())
    }
}
