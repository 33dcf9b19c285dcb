//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    database::{self, DatabaseSettings, Db},
    domain::{
        deals::{DealsService, PgDealsService},
        points::{PgPointsService, PointsService},
        points_config::{PgPointsConfigService, PointsConfigService},
        redemptions::{PgRedemptionsService, RedemptionsService},
        reports::{PgReportsService, ReportsService},
        rewards::{PgRewardsService, RewardsService},
        support_tickets::{PgSupportTicketsService, SupportTicketsService},
        users::{PgUsersService, UsersService},
    },
    notifications::{MailSettings, Notifier, build_mailer},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UsersService>,
    pub deals: Arc<dyn DealsService>,
    pub rewards: Arc<dyn RewardsService>,
    pub redemptions: Arc<dyn RedemptionsService>,
    pub points: Arc<dyn PointsService>,
    pub points_config: Arc<dyn PointsConfigService>,
    pub support_tickets: Arc<dyn SupportTicketsService>,
    pub reports: Arc<dyn ReportsService>,
}

impl AppContext {
    /// Wire every service against one pool and one mail provider.
    #[must_use]
    pub fn new(db: &Db, notifier: &Notifier) -> Self {
        Self {
            auth: Arc::new(PgAuthService::new(db.clone())),
            users: Arc::new(PgUsersService::new(db.clone(), notifier.clone())),
            deals: Arc::new(PgDealsService::new(db.clone(), notifier.clone())),
            rewards: Arc::new(PgRewardsService::new(db.clone())),
            redemptions: Arc::new(PgRedemptionsService::new(db.clone(), notifier.clone())),
            points: Arc::new(PgPointsService::new(db.clone())),
            points_config: Arc::new(PgPointsConfigService::new(db.clone())),
            support_tickets: Arc::new(PgSupportTicketsService::new(
                db.clone(),
                notifier.clone(),
            )),
            reports: Arc::new(PgReportsService::new(db.clone())),
        }
    }

    /// Connect, optionally migrate, and wire the services.
    ///
    /// # Errors
    ///
    /// Returns an error when connecting or migrating fails.
    pub async fn from_settings(
        settings: &DatabaseSettings,
        mail: &MailSettings,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect_with(&settings.url, settings.max_connections)
            .await
            .map_err(AppInitError::Database)?;

        if settings.migrate_on_start {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrate)?;
        }

        let notifier = Notifier::new(build_mailer(mail), mail.link_root());

        Ok(Self::new(&Db::new(pool), &notifier))
    }
}
