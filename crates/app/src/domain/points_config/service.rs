//! Points config service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    auth::Principal,
    database::Db,
    domain::{
        points_config::{
            data::PointsConfigUpdate,
            errors::PointsConfigServiceError,
            records::{PointsConfigRecord, PointsRates},
            repository::PgPointsConfigRepository,
        },
        regions::Region,
        users::records::Role,
    },
};

#[derive(Debug, Clone)]
pub struct PgPointsConfigService {
    db: Db,
    repository: PgPointsConfigRepository,
}

impl PgPointsConfigService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPointsConfigRepository::new(),
        }
    }
}

#[async_trait]
impl PointsConfigService for PgPointsConfigService {
    async fn list_configs(
        &self,
        actor: &Principal,
    ) -> Result<Vec<PointsConfigRecord>, PointsConfigServiceError> {
        actor.require_role(Role::Admin)?;

        let mut tx = self.db.begin().await?;

        let configs = self.repository.list_configs(&mut tx).await?;

        tx.commit().await?;

        Ok(configs)
    }

    async fn get_config(
        &self,
        actor: &Principal,
        region: &Region,
    ) -> Result<PointsConfigRecord, PointsConfigServiceError> {
        if !actor.can_manage_region(Some(region)) {
            return Err(PointsConfigServiceError::Forbidden);
        }

        let mut tx = self.db.begin().await?;

        let config = self
            .repository
            .get_config(&mut tx, region)
            .await?
            .ok_or(PointsConfigServiceError::NotFound)?;

        tx.commit().await?;

        Ok(config)
    }

    #[tracing::instrument(
        name = "points_config.service.update_config",
        skip(self, actor, update),
        fields(actor = %actor.user_uuid),
        err
    )]
    async fn update_config(
        &self,
        actor: &Principal,
        region: &Region,
        update: PointsConfigUpdate,
    ) -> Result<PointsConfigRecord, PointsConfigServiceError> {
        if !actor.can_manage_region(Some(region)) {
            return Err(PointsConfigServiceError::Forbidden);
        }

        let mut tx = self.db.begin().await?;

        let current = self.repository.get_config_for_update(&mut tx, region).await?;

        let resolved = update.resolve(current.as_ref())?;

        let saved = self
            .repository
            .upsert_config(&mut tx, region, resolved, actor.user_uuid)
            .await?;

        tx.commit().await?;

        info!(
            %region,
            created = current.is_none(),
            software = saved.rates.software_cents_per_point,
            hardware = saved.rates.hardware_cents_per_point,
            equipment = saved.rates.equipment_cents_per_point,
            "points configuration saved"
        );

        Ok(saved)
    }

    async fn rates_for(&self, region: &Region) -> Result<PointsRates, PointsConfigServiceError> {
        let mut tx = self.db.begin().await?;

        let rates = self
            .repository
            .rates_for(&mut tx, region)
            .await?
            .ok_or(PointsConfigServiceError::NotFound)?;

        tx.commit().await?;

        Ok(rates)
    }
}

#[automock]
#[async_trait]
pub trait PointsConfigService: Send + Sync {
    /// Every region's configuration. Admins and above.
    async fn list_configs(
        &self,
        actor: &Principal,
    ) -> Result<Vec<PointsConfigRecord>, PointsConfigServiceError>;

    async fn get_config(
        &self,
        actor: &Principal,
        region: &Region,
    ) -> Result<PointsConfigRecord, PointsConfigServiceError>;

    /// Create or patch a region's configuration.
    async fn update_config(
        &self,
        actor: &Principal,
        region: &Region,
        update: PointsConfigUpdate,
    ) -> Result<PointsConfigRecord, PointsConfigServiceError>;

    /// Conversion rates used when approving deals in `region`.
    async fn rates_for(&self, region: &Region) -> Result<PointsRates, PointsConfigServiceError>;
}
