//! Points service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    auth::Principal,
    database::Db,
    domain::{
        points::{
            data::{NewAdjustment, NewPointsEntry},
            errors::PointsServiceError,
            records::{PointsEntryRecord, PointsKind, PointsSummary},
            repository::PgPointsRepository,
        },
        points_config::{records::DEFAULT_GRAND_PRIZE_THRESHOLD, repository::PgPointsConfigRepository},
        users::{
            records::{Role, UserUuid},
            repository::PgUsersRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgPointsService {
    db: Db,
    repository: PgPointsRepository,
    users: PgUsersRepository,
    configs: PgPointsConfigRepository,
}

impl PgPointsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPointsRepository::new(),
            users: PgUsersRepository::new(),
            configs: PgPointsConfigRepository::new(),
        }
    }
}

#[async_trait]
impl PointsService for PgPointsService {
    async fn balance(&self, user: UserUuid) -> Result<PointsSummary, PointsServiceError> {
        let mut tx = self.db.begin().await?;

        let owner = self.users.get_user(&mut tx, user).await?;

        let threshold = match owner.region.as_ref() {
            Some(region) => self
                .configs
                .get_config(&mut tx, region)
                .await?
                .map_or(DEFAULT_GRAND_PRIZE_THRESHOLD, |config| {
                    config.grand_prize_threshold
                }),
            None => DEFAULT_GRAND_PRIZE_THRESHOLD,
        };

        let totals = self.repository.balance_totals(&mut tx, user).await?;

        tx.commit().await?;

        Ok(PointsSummary::from_totals(totals, threshold))
    }

    async fn history(&self, user: UserUuid) -> Result<Vec<PointsEntryRecord>, PointsServiceError> {
        let mut tx = self.db.begin().await?;

        let history = self.repository.list_history(&mut tx, user).await?;

        tx.commit().await?;

        Ok(history)
    }

    #[tracing::instrument(
        name = "points.service.adjust",
        skip(self, actor, adjustment),
        fields(actor = %actor.user_uuid, user_uuid = %adjustment.user_uuid, points = adjustment.points),
        err
    )]
    async fn adjust(
        &self,
        actor: &Principal,
        adjustment: NewAdjustment,
    ) -> Result<PointsEntryRecord, PointsServiceError> {
        actor.require_role(Role::Admin)?;

        if adjustment.points == 0 {
            return Err(PointsServiceError::InvalidData);
        }

        let description = adjustment.description.trim();

        if description.is_empty() {
            return Err(PointsServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        // Serialises with redemptions debiting the same user.
        self.users
            .get_user_for_update(&mut tx, adjustment.user_uuid)
            .await?;

        let available = self
            .repository
            .available_balance(&mut tx, adjustment.user_uuid)
            .await?;

        if available.saturating_add(adjustment.points) < 0 {
            return Err(PointsServiceError::InsufficientPoints);
        }

        let entry = self
            .repository
            .insert_entry(
                &mut tx,
                NewPointsEntry {
                    user_uuid: adjustment.user_uuid,
                    points: adjustment.points,
                    kind: PointsKind::Adjustment,
                    deal_uuid: None,
                    user_reward_uuid: None,
                    description: description.to_string(),
                    created_by: Some(actor.user_uuid),
                },
            )
            .await?;

        tx.commit().await?;

        info!(entry_uuid = %entry.uuid, "points adjusted");

        Ok(entry)
    }
}

#[automock]
#[async_trait]
pub trait PointsService: Send + Sync {
    /// Earned, spent and available points plus grand prize eligibility.
    async fn balance(&self, user: UserUuid) -> Result<PointsSummary, PointsServiceError>;

    /// Ledger rows, newest first.
    async fn history(&self, user: UserUuid) -> Result<Vec<PointsEntryRecord>, PointsServiceError>;

    /// Manual credit or debit. Debits may not take the balance below zero.
    async fn adjust(
        &self,
        actor: &Principal,
        adjustment: NewAdjustment,
    ) -> Result<PointsEntryRecord, PointsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::test::TestContext;

    fn adjustment(user: UserUuid, points: i64) -> NewAdjustment {
        NewAdjustment {
            user_uuid: user,
            points,
            description: "goodwill".to_string(),
        }
    }

    #[tokio::test]
    async fn new_users_have_empty_balance() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx
            .create_user("partner@example.com", Role::User, None)
            .await?;

        let summary = ctx.points.balance(user.uuid).await?;

        assert_eq!(summary.available, 0);
        assert_eq!(summary.grand_prize_threshold, DEFAULT_GRAND_PRIZE_THRESHOLD);
        assert!(!summary.grand_prize_eligible);

        Ok(())
    }

    #[tokio::test]
    async fn adjustments_credit_and_debit() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.admin(Role::Admin, None).await?;
        let user = ctx
            .create_user("partner@example.com", Role::User, None)
            .await?;

        ctx.points.adjust(&admin, adjustment(user.uuid, 500)).await?;
        ctx.points.adjust(&admin, adjustment(user.uuid, -200)).await?;

        let summary = ctx.points.balance(user.uuid).await?;

        assert_eq!(summary.earned, 500);
        assert_eq!(summary.available, 300);

        let history = ctx.points.history(user.uuid).await?;

        assert_eq!(history.len(), 2);
        assert_eq!(history.first().map(|e| e.points), Some(-200), "newest first");

        Ok(())
    }

    #[tokio::test]
    async fn debit_below_zero_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.admin(Role::Admin, None).await?;
        let user = ctx
            .create_user("partner@example.com", Role::User, None)
            .await?;

        ctx.points.adjust(&admin, adjustment(user.uuid, 100)).await?;

        let result = ctx.points.adjust(&admin, adjustment(user.uuid, -101)).await;

        assert!(matches!(result, Err(PointsServiceError::InsufficientPoints)));

        Ok(())
    }

    #[tokio::test]
    async fn regional_admins_cannot_adjust() -> TestResult {
        let ctx = TestContext::new().await;
        let regional = ctx.admin(Role::RegionalAdmin, Some("north")).await?;
        let user = ctx
            .create_user("partner@example.com", Role::User, Some("north"))
            .await?;

        let result = ctx.points.adjust(&regional, adjustment(user.uuid, 10)).await;

        assert!(matches!(result, Err(PointsServiceError::Forbidden)));

        Ok(())
    }

    #[tokio::test]
    async fn zero_adjustment_is_invalid() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.admin(Role::Admin, None).await?;

        let result = ctx.points.adjust(&admin, adjustment(admin.user_uuid, 0)).await;

        assert!(matches!(result, Err(PointsServiceError::InvalidData)));

        Ok(())
    }
}
