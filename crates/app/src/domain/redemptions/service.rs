//! Redemptions service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    auth::Principal,
    database::Db,
    domain::{
        points::{data::NewPointsEntry, records::PointsKind, repository::PgPointsRepository},
        points_config::repository::PgPointsConfigRepository,
        redemptions::{
            data::{RedemptionFilter, RedemptionStatusUpdate},
            errors::RedemptionsServiceError,
            records::{RedemptionRecord, RedemptionStatus, RedemptionUuid},
            repository::PgRedemptionsRepository,
        },
        rewards::{records::RewardUuid, repository::PgRewardsRepository},
        users::{records::UserUuid, repository::PgUsersRepository},
    },
    notifications::Notifier,
};

#[derive(Debug, Clone)]
pub struct PgRedemptionsService {
    db: Db,
    repository: PgRedemptionsRepository,
    rewards: PgRewardsRepository,
    users: PgUsersRepository,
    configs: PgPointsConfigRepository,
    ledger: PgPointsRepository,
    notifier: Notifier,
}

impl PgRedemptionsService {
    #[must_use]
    pub fn new(db: Db, notifier: Notifier) -> Self {
        Self {
            db,
            repository: PgRedemptionsRepository::new(),
            rewards: PgRewardsRepository::new(),
            users: PgUsersRepository::new(),
            configs: PgPointsConfigRepository::new(),
            ledger: PgPointsRepository::new(),
            notifier,
        }
    }
}

fn signed(points: u64) -> Result<i64, RedemptionsServiceError> {
    i64::try_from(points).map_err(|_| RedemptionsServiceError::InvalidData)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[async_trait]
impl RedemptionsService for PgRedemptionsService {
    #[tracing::instrument(name = "redemptions.service.redeem", skip(self, shipping_address), fields(%user, %reward), err)]
    async fn redeem(
        &self,
        user: UserUuid,
        reward: RewardUuid,
        shipping_address: Option<String>,
    ) -> Result<RedemptionRecord, RedemptionsServiceError> {
        let mut tx = self.db.begin().await?;

        // Serialises concurrent redemptions by the same user against their balance.
        let owner = self.users.get_user_for_update(&mut tx, user).await?;

        let item = self
            .rewards
            .get_reward_for_update(&mut tx, reward)
            .await
            .map_err(|error| match error {
                sqlx::Error::RowNotFound => RedemptionsServiceError::RewardUnavailable,
                error => error.into(),
            })?;

        if !item.is_active {
            return Err(RedemptionsServiceError::RewardUnavailable);
        }

        if !item.in_stock() {
            return Err(RedemptionsServiceError::OutOfStock);
        }

        if let Some(region) = owner.region.as_ref() {
            let config = self.configs.get_config(&mut tx, region).await?;

            if config.is_some_and(|config| !config.redemption_open_at(Timestamp::now())) {
                return Err(RedemptionsServiceError::RedemptionClosed);
            }
        }

        let available = self.ledger.available_balance(&mut tx, user).await?;
        let cost = signed(item.points_cost)?;

        if available < cost {
            return Err(RedemptionsServiceError::InsufficientPoints {
                available,
                required: item.points_cost,
            });
        }

        if item.stock.is_some() && self.rewards.take_stock(&mut tx, reward).await?.is_none() {
            return Err(RedemptionsServiceError::OutOfStock);
        }

        let shipping_address = non_blank(shipping_address);

        let redemption = self
            .repository
            .create_redemption(
                &mut tx,
                user,
                reward,
                item.points_cost,
                shipping_address.as_deref(),
            )
            .await?;

        self.ledger
            .insert_entry(
                &mut tx,
                NewPointsEntry {
                    user_uuid: user,
                    points: -cost,
                    kind: PointsKind::Redemption,
                    deal_uuid: None,
                    user_reward_uuid: Some(redemption.uuid),
                    description: format!("Redeemed: {}", item.name),
                    created_by: Some(user),
                },
            )
            .await?;

        tx.commit().await?;

        info!(
            redemption_uuid = %redemption.uuid,
            points_spent = redemption.points_spent,
            "reward redeemed"
        );

        Ok(redemption)
    }

    async fn list_redemptions_for_user(
        &self,
        user: UserUuid,
    ) -> Result<Vec<RedemptionRecord>, RedemptionsServiceError> {
        let mut tx = self.db.begin().await?;

        let redemptions = self
            .repository
            .list_redemptions_for_user(&mut tx, user)
            .await?;

        tx.commit().await?;

        Ok(redemptions)
    }

    async fn list_redemptions(
        &self,
        actor: &Principal,
        filter: RedemptionFilter,
    ) -> Result<Vec<RedemptionRecord>, RedemptionsServiceError> {
        let region = actor.admin_scope()?;

        let mut tx = self.db.begin().await?;

        let redemptions = self
            .repository
            .list_redemptions(&mut tx, region, filter.status)
            .await?;

        tx.commit().await?;

        Ok(redemptions)
    }

    #[tracing::instrument(
        name = "redemptions.service.update_redemption_status",
        skip(self, actor, update),
        fields(actor = %actor.user_uuid, status = %update.status),
        err
    )]
    async fn update_redemption_status(
        &self,
        actor: &Principal,
        redemption: RedemptionUuid,
        update: RedemptionStatusUpdate,
    ) -> Result<RedemptionRecord, RedemptionsServiceError> {
        actor.admin_scope()?;

        let mut tx = self.db.begin().await?;

        let existing = self
            .repository
            .get_redemption_for_update(&mut tx, redemption)
            .await?;

        let owner = self.users.get_user(&mut tx, existing.user_uuid).await?;

        if !actor.can_manage_region(owner.region.as_ref()) {
            return Err(RedemptionsServiceError::Forbidden);
        }

        if !existing.status.can_transition_to(update.status) {
            return Err(RedemptionsServiceError::InvalidTransition {
                from: existing.status.to_string(),
                to: update.status.to_string(),
            });
        }

        let tracking_number = non_blank(update.tracking_number);

        let updated = self
            .repository
            .update_status(
                &mut tx,
                redemption,
                update.status,
                tracking_number.as_deref(),
                actor.user_uuid,
            )
            .await?;

        let reward = self.rewards.get_reward(&mut tx, updated.reward_uuid).await?;

        if updated.status == RedemptionStatus::Rejected {
            self.ledger
                .insert_entry(
                    &mut tx,
                    NewPointsEntry {
                        user_uuid: updated.user_uuid,
                        points: signed(updated.points_spent)?,
                        kind: PointsKind::RedemptionRefund,
                        deal_uuid: None,
                        user_reward_uuid: Some(updated.uuid),
                        description: format!("Refund: {}", reward.name),
                        created_by: Some(actor.user_uuid),
                    },
                )
                .await?;

            self.rewards.restore_stock(&mut tx, reward.uuid).await?;
        }

        tx.commit().await?;

        info!(
            redemption_uuid = %updated.uuid,
            from = %existing.status,
            to = %updated.status,
            "redemption status changed"
        );

        self.notifier
            .redemption_status(&owner, &reward.name, &updated)
            .await;

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait RedemptionsService: Send + Sync {
    /// Spend points on a reward. Stock, window and balance are checked under
    /// the user's row lock.
    async fn redeem(
        &self,
        user: UserUuid,
        reward: RewardUuid,
        shipping_address: Option<String>,
    ) -> Result<RedemptionRecord, RedemptionsServiceError>;

    async fn list_redemptions_for_user(
        &self,
        user: UserUuid,
    ) -> Result<Vec<RedemptionRecord>, RedemptionsServiceError>;

    async fn list_redemptions(
        &self,
        actor: &Principal,
        filter: RedemptionFilter,
    ) -> Result<Vec<RedemptionRecord>, RedemptionsServiceError>;

    /// Advance a redemption. Rejection refunds the points and restores stock.
    async fn update_redemption_status(
        &self,
        actor: &Principal,
        redemption: RedemptionUuid,
        update: RedemptionStatusUpdate,
    ) -> Result<RedemptionRecord, RedemptionsServiceError>;
}
