//! Deals service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    auth::Principal,
    database::Db,
    domain::{
        MAX_STORED_AMOUNT, MAX_STORED_COUNT,
        deals::{
            data::{DealFilter, DealUpdate, NewDeal},
            errors::DealsServiceError,
            records::{DealRecord, DealUuid},
            repository::PgDealsRepository,
        },
        points::{data::NewPointsEntry, records::PointsKind, repository::PgPointsRepository},
        points_config::repository::PgPointsConfigRepository,
        users::{
            records::{UserRecord, UserUuid},
            repository::PgUsersRepository,
        },
    },
    notifications::Notifier,
};

#[derive(Debug, Clone)]
pub struct PgDealsService {
    db: Db,
    repository: PgDealsRepository,
    users: PgUsersRepository,
    configs: PgPointsConfigRepository,
    ledger: PgPointsRepository,
    notifier: Notifier,
}

impl PgDealsService {
    #[must_use]
    pub fn new(db: Db, notifier: Notifier) -> Self {
        Self {
            db,
            repository: PgDealsRepository::new(),
            users: PgUsersRepository::new(),
            configs: PgPointsConfigRepository::new(),
            ledger: PgPointsRepository::new(),
            notifier,
        }
    }
}

fn validate_deal(deal: &NewDeal) -> Result<(), DealsServiceError> {
    if deal.customer_name.trim().is_empty() {
        return Err(DealsServiceError::MissingRequiredData);
    }

    if deal.quantity == 0
        || deal.quantity > MAX_STORED_COUNT
        || deal.deal_value > MAX_STORED_AMOUNT
    {
        return Err(DealsServiceError::InvalidData);
    }

    Ok(())
}

/// Apply an owner's edits over the stored deal.
fn merge_update(existing: &DealRecord, update: DealUpdate) -> NewDeal {
    NewDeal {
        product_type: update.product_type.unwrap_or(existing.product_type),
        customer_name: update
            .customer_name
            .map_or_else(|| existing.customer_name.clone(), |name| name.trim().to_string()),
        deal_value: update.deal_value.unwrap_or(existing.deal_value),
        quantity: update.quantity.unwrap_or(existing.quantity),
        close_date: update.close_date.unwrap_or(existing.close_date),
    }
}

impl PgDealsService {
    /// Lock a pending deal and its owner for an admin decision.
    async fn open_for_decision(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        actor: &Principal,
        deal: DealUuid,
    ) -> Result<(DealRecord, UserRecord), DealsServiceError> {
        let existing = self.repository.get_deal_for_update(tx, deal).await?;
        let owner = self.users.get_user(tx, existing.user_uuid).await?;

        if !actor.can_manage_region(owner.region.as_ref()) {
            return Err(DealsServiceError::Forbidden);
        }

        if !existing.status.is_pending() {
            return Err(DealsServiceError::InvalidTransition);
        }

        Ok((existing, owner))
    }
}

#[async_trait]
impl DealsService for PgDealsService {
    #[tracing::instrument(name = "deals.service.create_deal", skip(self, deal), fields(%owner), err)]
    async fn create_deal(
        &self,
        owner: UserUuid,
        deal: NewDeal,
    ) -> Result<DealRecord, DealsServiceError> {
        validate_deal(&deal)?;

        let deal = NewDeal {
            customer_name: deal.customer_name.trim().to_string(),
            ..deal
        };

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_deal(&mut tx, DealUuid::new(), owner, deal)
            .await?;

        tx.commit().await?;

        info!(deal_uuid = %created.uuid, "deal registered");

        Ok(created)
    }

    async fn list_deals_for_user(
        &self,
        owner: UserUuid,
    ) -> Result<Vec<DealRecord>, DealsServiceError> {
        let mut tx = self.db.begin().await?;

        let deals = self.repository.list_deals_for_user(&mut tx, owner).await?;

        tx.commit().await?;

        Ok(deals)
    }

    async fn get_deal(
        &self,
        actor: &Principal,
        deal: DealUuid,
    ) -> Result<DealRecord, DealsServiceError> {
        let mut tx = self.db.begin().await?;

        let found = self.repository.get_deal(&mut tx, deal).await?;

        if found.user_uuid != actor.user_uuid {
            let owner = self.users.get_user(&mut tx, found.user_uuid).await?;

            // Hide deals outside the actor's reach as if they did not exist.
            if !actor.can_manage_region(owner.region.as_ref()) {
                return Err(DealsServiceError::NotFound);
            }
        }

        tx.commit().await?;

        Ok(found)
    }

    #[tracing::instrument(name = "deals.service.update_deal", skip(self, actor, update), fields(actor = %actor.user_uuid), err)]
    async fn update_deal(
        &self,
        actor: &Principal,
        deal: DealUuid,
        update: DealUpdate,
    ) -> Result<DealRecord, DealsServiceError> {
        let mut tx = self.db.begin().await?;

        let existing = self.repository.get_deal_for_update(&mut tx, deal).await?;

        if existing.user_uuid != actor.user_uuid {
            return Err(DealsServiceError::NotFound);
        }

        if !existing.status.is_pending() {
            return Err(DealsServiceError::InvalidTransition);
        }

        let values = merge_update(&existing, update);

        validate_deal(&values)?;

        let updated = self.repository.update_deal(&mut tx, deal, values).await?;

        tx.commit().await?;

        info!(deal_uuid = %updated.uuid, "deal updated");

        Ok(updated)
    }

    async fn list_deals(
        &self,
        actor: &Principal,
        filter: DealFilter,
    ) -> Result<Vec<DealRecord>, DealsServiceError> {
        let region = actor.admin_scope()?;

        let mut tx = self.db.begin().await?;

        let deals = self
            .repository
            .list_deals(&mut tx, region, filter.status)
            .await?;

        tx.commit().await?;

        Ok(deals)
    }

    #[tracing::instrument(name = "deals.service.approve_deal", skip(self, actor), fields(actor = %actor.user_uuid), err)]
    async fn approve_deal(
        &self,
        actor: &Principal,
        deal: DealUuid,
    ) -> Result<DealRecord, DealsServiceError> {
        actor.admin_scope()?;

        let mut tx = self.db.begin().await?;

        let (existing, owner) = self.open_for_decision(&mut tx, actor, deal).await?;

        let region = owner
            .region
            .as_ref()
            .ok_or(DealsServiceError::MissingPointsConfig)?;

        let rates = self
            .configs
            .rates_for(&mut tx, region)
            .await?
            .ok_or(DealsServiceError::MissingPointsConfig)?;

        let points = rates.points_for(existing.product_type, existing.deal_value);

        let approved = self
            .repository
            .approve_deal(&mut tx, deal, points, actor.user_uuid)
            .await?;

        if points > 0 {
            self.ledger
                .insert_entry(
                    &mut tx,
                    NewPointsEntry {
                        user_uuid: owner.uuid,
                        points: i64::try_from(points).map_err(|_| DealsServiceError::InvalidData)?,
                        kind: PointsKind::DealApproved,
                        deal_uuid: Some(approved.uuid),
                        user_reward_uuid: None,
                        description: format!("Deal approved: {}", approved.customer_name),
                        created_by: Some(actor.user_uuid),
                    },
                )
                .await?;
        }

        tx.commit().await?;

        info!(deal_uuid = %approved.uuid, %region, points, "deal approved");

        self.notifier.deal_approved(&owner, &approved).await;

        Ok(approved)
    }

    #[tracing::instrument(name = "deals.service.reject_deal", skip(self, actor, reason), fields(actor = %actor.user_uuid), err)]
    async fn reject_deal(
        &self,
        actor: &Principal,
        deal: DealUuid,
        reason: Option<String>,
    ) -> Result<DealRecord, DealsServiceError> {
        actor.admin_scope()?;

        let mut tx = self.db.begin().await?;

        let (_, owner) = self.open_for_decision(&mut tx, actor, deal).await?;

        let reason = reason
            .map(|reason| reason.trim().to_string())
            .filter(|reason| !reason.is_empty());

        let rejected = self
            .repository
            .reject_deal(&mut tx, deal, actor.user_uuid, reason.as_deref())
            .await?;

        tx.commit().await?;

        info!(deal_uuid = %rejected.uuid, "deal rejected");

        self.notifier.deal_rejected(&owner, &rejected).await;

        Ok(rejected)
    }
}

#[automock]
#[async_trait]
pub trait DealsService: Send + Sync {
    /// Register a new pending deal for `owner`.
    async fn create_deal(
        &self,
        owner: UserUuid,
        deal: NewDeal,
    ) -> Result<DealRecord, DealsServiceError>;

    async fn list_deals_for_user(
        &self,
        owner: UserUuid,
    ) -> Result<Vec<DealRecord>, DealsServiceError>;

    /// A deal visible to the actor: their own, or one in their admin scope.
    async fn get_deal(
        &self,
        actor: &Principal,
        deal: DealUuid,
    ) -> Result<DealRecord, DealsServiceError>;

    /// Owner edits while the deal is still pending.
    async fn update_deal(
        &self,
        actor: &Principal,
        deal: DealUuid,
        update: DealUpdate,
    ) -> Result<DealRecord, DealsServiceError>;

    async fn list_deals(
        &self,
        actor: &Principal,
        filter: DealFilter,
    ) -> Result<Vec<DealRecord>, DealsServiceError>;

    /// Approve a pending deal and credit its points using the owner's region rates.
    async fn approve_deal(
        &self,
        actor: &Principal,
        deal: DealUuid,
    ) -> Result<DealRecord, DealsServiceError>;

    async fn reject_deal(
        &self,
        actor: &Principal,
        deal: DealUuid,
        reason: Option<String>,
    ) -> Result<DealRecord, DealsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;
    use crate::{
        domain::{
            deals::records::{DealStatus, ProductType},
            points::PointsService,
            points_config::{PointsConfigService, data::PointsConfigUpdate},
            users::records::Role,
        },
        test::{TestContext, region},
    };

    fn new_deal(product_type: ProductType, deal_value: u64) -> NewDeal {
        NewDeal {
            product_type,
            customer_name: "Acme Corp".to_string(),
            deal_value,
            quantity: 3,
            close_date: date(2026, 3, 31),
        }
    }

    #[test]
    fn merge_update_keeps_unset_fields() {
        let now = jiff::Timestamp::now();
        let existing = DealRecord {
            uuid: DealUuid::new(),
            user_uuid: UserUuid::new(),
            product_type: ProductType::Software,
            customer_name: "Acme".to_string(),
            deal_value: 1_000,
            quantity: 1,
            close_date: date(2026, 1, 1),
            status: DealStatus::Pending,
            points_earned: 0,
            approved_by: None,
            approved_at: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        };

        let merged = merge_update(
            &existing,
            DealUpdate {
                deal_value: Some(2_000),
                customer_name: Some("  Acme Ltd ".to_string()),
                ..DealUpdate::default()
            },
        );

        assert_eq!(merged.deal_value, 2_000);
        assert_eq!(merged.customer_name, "Acme Ltd");
        assert_eq!(merged.product_type, ProductType::Software);
        assert_eq!(merged.quantity, 1);
    }

    #[tokio::test]
    async fn new_deals_are_pending_with_zero_points() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = ctx
            .create_user("partner@example.com", Role::User, Some("north"))
            .await?;

        let deal = ctx
            .deals
            .create_deal(owner.uuid, new_deal(ProductType::Software, 50_000))
            .await?;

        assert_eq!(deal.status, DealStatus::Pending);
        assert_eq!(deal.points_earned, 0);
        assert_eq!(ctx.points.balance(owner.uuid).await?.available, 0);

        Ok(())
    }

    #[tokio::test]
    async fn approval_credits_points_at_region_rate() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.admin(Role::Admin, None).await?;
        let owner = ctx
            .create_user("partner@example.com", Role::User, Some("north"))
            .await?;

        ctx.points_config
            .update_config(
                &admin,
                &region("north")?,
                PointsConfigUpdate {
                    hardware_cents_per_point: Some(250),
                    ..PointsConfigUpdate::default()
                },
            )
            .await?;

        let deal = ctx
            .deals
            .create_deal(owner.uuid, new_deal(ProductType::Hardware, 100_099))
            .await?;

        let approved = ctx.deals.approve_deal(&admin, deal.uuid).await?;

        assert_eq!(approved.status, DealStatus::Approved);
        assert_eq!(approved.points_earned, 400);
        assert_eq!(approved.approved_by, Some(admin.user_uuid));

        let summary = ctx.points.balance(owner.uuid).await?;

        assert_eq!(summary.earned, 400);
        assert_eq!(summary.available, 400);

        let history = ctx.points.history(owner.uuid).await?;

        assert_eq!(history.len(), 1);
        assert_eq!(history.first().and_then(|e| e.deal_uuid), Some(deal.uuid));
        assert_eq!(ctx.mailer.sent_to("partner@example.com").len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn approval_without_region_config_fails() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.admin(Role::Admin, None).await?;
        let owner = ctx
            .create_user("partner@example.com", Role::User, Some("north"))
            .await?;

        let deal = ctx
            .deals
            .create_deal(owner.uuid, new_deal(ProductType::Software, 10_000))
            .await?;

        let result = ctx.deals.approve_deal(&admin, deal.uuid).await;

        assert!(matches!(result, Err(DealsServiceError::MissingPointsConfig)));

        let unchanged = ctx.deals.get_deal(&admin, deal.uuid).await?;

        assert_eq!(unchanged.status, DealStatus::Pending);
        assert_eq!(unchanged.points_earned, 0);

        Ok(())
    }

    #[tokio::test]
    async fn rejection_keeps_points_at_zero() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.admin(Role::Admin, None).await?;
        let owner = ctx
            .create_user("partner@example.com", Role::User, Some("north"))
            .await?;
        ctx.configure_region("north").await?;

        let deal = ctx
            .deals
            .create_deal(owner.uuid, new_deal(ProductType::Software, 10_000))
            .await?;

        let rejected = ctx
            .deals
            .reject_deal(&admin, deal.uuid, Some("duplicate".to_string()))
            .await?;

        assert_eq!(rejected.status, DealStatus::Rejected);
        assert_eq!(rejected.points_earned, 0);
        assert_eq!(rejected.rejection_reason.as_deref(), Some("duplicate"));
        assert_eq!(ctx.points.balance(owner.uuid).await?.available, 0);

        assert!(matches!(
            ctx.deals.approve_deal(&admin, deal.uuid).await,
            Err(DealsServiceError::InvalidTransition)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn deals_cannot_be_approved_twice() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.admin(Role::Admin, None).await?;
        let owner = ctx
            .create_user("partner@example.com", Role::User, Some("north"))
            .await?;
        ctx.configure_region("north").await?;

        let deal = ctx
            .deals
            .create_deal(owner.uuid, new_deal(ProductType::Software, 10_000))
            .await?;

        ctx.deals.approve_deal(&admin, deal.uuid).await?;

        assert!(matches!(
            ctx.deals.approve_deal(&admin, deal.uuid).await,
            Err(DealsServiceError::InvalidTransition)
        ));
        assert_eq!(ctx.points.history(owner.uuid).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn regional_admin_is_scoped_to_region() -> TestResult {
        let ctx = TestContext::new().await;
        let regional = ctx.admin(Role::RegionalAdmin, Some("north")).await?;
        let south_owner = ctx
            .create_user("south@example.com", Role::User, Some("south"))
            .await?;
        let north_owner = ctx
            .create_user("north@example.com", Role::User, Some("north"))
            .await?;

        let south_deal = ctx
            .deals
            .create_deal(south_owner.uuid, new_deal(ProductType::Software, 10_000))
            .await?;
        let north_deal = ctx
            .deals
            .create_deal(north_owner.uuid, new_deal(ProductType::Software, 10_000))
            .await?;

        assert!(matches!(
            ctx.deals.approve_deal(&regional, south_deal.uuid).await,
            Err(DealsServiceError::Forbidden)
        ));

        let visible = ctx
            .deals
            .list_deals(&regional, DealFilter::default())
            .await?;

        assert_eq!(
            visible.iter().map(|d| d.uuid).collect::<Vec<_>>(),
            vec![north_deal.uuid]
        );

        Ok(())
    }

    #[tokio::test]
    async fn owners_edit_only_pending_deals() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.admin(Role::Admin, None).await?;
        let owner = ctx
            .create_user("partner@example.com", Role::User, Some("north"))
            .await?;
        let owner_principal = Principal::from(&owner);
        ctx.configure_region("north").await?;

        let deal = ctx
            .deals
            .create_deal(owner.uuid, new_deal(ProductType::Software, 10_000))
            .await?;

        let edited = ctx
            .deals
            .update_deal(
                &owner_principal,
                deal.uuid,
                DealUpdate {
                    quantity: Some(7),
                    ..DealUpdate::default()
                },
            )
            .await?;

        assert_eq!(edited.quantity, 7);
        assert_eq!(edited.points_earned, 0);

        ctx.deals.approve_deal(&admin, deal.uuid).await?;

        assert!(matches!(
            ctx.deals
                .update_deal(&owner_principal, deal.uuid, DealUpdate::default())
                .await,
            Err(DealsServiceError::InvalidTransition)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn other_users_cannot_see_deals() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = ctx
            .create_user("partner@example.com", Role::User, Some("north"))
            .await?;
        let stranger = ctx
            .create_user("stranger@example.com", Role::User, Some("north"))
            .await?;

        let deal = ctx
            .deals
            .create_deal(owner.uuid, new_deal(ProductType::Equipment, 10_000))
            .await?;

        assert!(matches!(
            ctx.deals.get_deal(&Principal::from(&stranger), deal.uuid).await,
            Err(DealsServiceError::NotFound)
        ));
        assert_eq!(
            ctx.deals.list_deals_for_user(owner.uuid).await?.len(),
            1
        );

        Ok(())
    }

    #[tokio::test]
    async fn zero_quantity_is_invalid() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = ctx
            .create_user("partner@example.com", Role::User, None)
            .await?;

        let result = ctx
            .deals
            .create_deal(
                owner.uuid,
                NewDeal {
                    quantity: 0,
                    ..new_deal(ProductType::Software, 100)
                },
            )
            .await;

        assert!(matches!(result, Err(DealsServiceError::InvalidData)));

        Ok(())
    }

    #[test]
    fn amounts_beyond_column_range_are_invalid() {
        let too_valuable = new_deal(ProductType::Software, MAX_STORED_AMOUNT + 1);
        let too_many = NewDeal {
            quantity: MAX_STORED_COUNT + 1,
            ..new_deal(ProductType::Software, 100)
        };

        assert!(matches!(
            validate_deal(&too_valuable),
            Err(DealsServiceError::InvalidData)
        ));
        assert!(matches!(
            validate_deal(&too_many),
            Err(DealsServiceError::InvalidData)
        ));
        assert!(validate_deal(&new_deal(ProductType::Software, MAX_STORED_AMOUNT)).is_ok());
    }

    #[tokio::test]
    async fn oversized_deal_value_is_rejected_before_storage() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = ctx
            .create_user("partner@example.com", Role::User, None)
            .await?;

        let result = ctx
            .deals
            .create_deal(owner.uuid, new_deal(ProductType::Software, u64::MAX))
            .await;

        assert!(matches!(result, Err(DealsServiceError::InvalidData)));
        assert!(ctx.deals.list_deals_for_user(owner.uuid).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn approval_matches_the_region_rates_lookup() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.admin(Role::Admin, None).await?;

        for (code, rate) in [("north", 100), ("south", 1_000)] {
            ctx.points_config
                .update_config(
                    &admin,
                    &region(code)?,
                    PointsConfigUpdate {
                        equipment_cents_per_point: Some(rate),
                        ..PointsConfigUpdate::default()
                    },
                )
                .await?;
        }

        for code in ["north", "south"] {
            let owner = ctx
                .create_user(&format!("{code}@example.com"), Role::User, Some(code))
                .await?;
            let deal = ctx
                .deals
                .create_deal(owner.uuid, new_deal(ProductType::Equipment, 50_000))
                .await?;

            let approved = ctx.deals.approve_deal(&admin, deal.uuid).await?;
            let rates = ctx.points_config.rates_for(&region(code)?).await?;

            assert_eq!(
                approved.points_earned,
                rates.points_for(ProductType::Equipment, 50_000),
                "{code} deals earn at {code} rates"
            );
        }

        Ok(())
    }
}
