//! Reports service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    auth::Principal,
    database::Db,
    domain::{
        reports::{
            errors::ReportsServiceError, records::ReportSummary, repository::PgReportsRepository,
        },
        users::records::Role,
    },
};

#[derive(Debug, Clone)]
pub struct PgReportsService {
    db: Db,
    repository: PgReportsRepository,
}

impl PgReportsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgReportsRepository::new(),
        }
    }
}

#[async_trait]
impl ReportsService for PgReportsService {
    #[tracing::instrument(name = "reports.service.summary", skip(self, actor), fields(actor = %actor.user_uuid), err)]
    async fn summary(&self, actor: &Principal) -> Result<ReportSummary, ReportsServiceError> {
        actor.require_role(Role::SuperAdmin)?;

        let mut tx = self.db.begin().await?;

        let overview = self.repository.overview(&mut tx).await?;
        let deals = self.repository.deal_tallies(&mut tx).await?;
        let redemptions = self.repository.redemption_tallies(&mut tx).await?;
        let regions = self.repository.region_breakdown(&mut tx).await?;

        tx.commit().await?;

        Ok(ReportSummary {
            users: overview.users,
            deals,
            points_awarded: overview.points_awarded,
            points_spent: overview.points_spent,
            redemptions,
            open_tickets: overview.open_tickets,
            regions,
        })
    }
}

#[automock]
#[async_trait]
pub trait ReportsService: Send + Sync {
    /// Programme-wide totals. Super-admin only.
    async fn summary(&self, actor: &Principal) -> Result<ReportSummary, ReportsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;
    use crate::{
        domain::{
            deals::{DealsService, data::NewDeal, records::{DealStatus, ProductType}},
            points_config::{PointsConfigService, data::PointsConfigUpdate},
            regions::Region,
            support_tickets::{
                SupportTicketsService, data::NewTicket, records::TicketPriority,
            },
        },
        test::TestContext,
    };

    #[tokio::test]
    async fn only_super_admins_read_reports() -> TestResult {
        let ctx = TestContext::new().await;
        let admin = ctx.admin(Role::Admin, None).await?;

        assert!(matches!(
            ctx.reports.summary(&admin).await,
            Err(ReportsServiceError::Forbidden)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn summary_aggregates_activity() -> TestResult {
        let ctx = TestContext::new().await;
        let super_admin = ctx.admin(Role::SuperAdmin, None).await?;
        let partner = ctx
            .create_user("partner@example.com", Role::User, Some("north"))
            .await?;
        ctx.register("pending@example.com", "pending").await?;
        ctx.points_config
            .update_config(
                &super_admin,
                &Region::parse("north")?,
                PointsConfigUpdate::default(),
            )
            .await?;

        let deal = ctx
            .deals
            .create_deal(
                partner.uuid,
                NewDeal {
                    product_type: ProductType::Software,
                    customer_name: "Acme".to_string(),
                    deal_value: 50_000,
                    quantity: 1,
                    close_date: date(2026, 6, 30),
                },
            )
            .await?;
        ctx.deals.approve_deal(&super_admin, deal.uuid).await?;

        ctx.support_tickets
            .create_ticket(
                partner.uuid,
                NewTicket {
                    subject: "Question".to_string(),
                    message: "How do I redeem?".to_string(),
                    priority: TicketPriority::Low,
                },
            )
            .await?;

        let summary = ctx.reports.summary(&super_admin).await?;

        assert_eq!(summary.users.pending, 1);
        assert_eq!(summary.users.approved, 2);
        assert_eq!(summary.points_awarded, 500);
        assert_eq!(summary.points_spent, 0);
        assert_eq!(summary.open_tickets, 1);
        assert_eq!(
            summary
                .deals
                .iter()
                .find(|tally| tally.status == DealStatus::Approved)
                .map(|tally| (tally.count, tally.total_value)),
            Some((1, 50_000))
        );

        let north_region = Region::parse("north")?;
        let north = summary
            .regions
            .iter()
            .find(|row| row.region.as_ref() == Some(&north_region))
            .ok_or("north region should be reported")?;

        assert_eq!(north.approved_deals, 1);
        assert_eq!(north.points_awarded, 500);

        Ok(())
    }
}
