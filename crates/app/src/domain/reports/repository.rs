//! Reports Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    reports::records::{DealTally, Overview, RedemptionTally, RegionBreakdown, UserCounts},
    rows::{try_get_enum, try_get_u64},
};

const OVERVIEW_SQL: &str = include_str!("sql/overview.sql");
const DEAL_TALLIES_SQL: &str = include_str!("sql/deal_tallies.sql");
const REDEMPTION_TALLIES_SQL: &str = include_str!("sql/redemption_tallies.sql");
const REGION_BREAKDOWN_SQL: &str = include_str!("sql/region_breakdown.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReportsRepository;

impl PgReportsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn overview(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Overview, sqlx::Error> {
        query_as::<Postgres, Overview>(OVERVIEW_SQL)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn deal_tallies(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<DealTally>, sqlx::Error> {
        query_as::<Postgres, DealTally>(DEAL_TALLIES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn redemption_tallies(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<RedemptionTally>, sqlx::Error> {
        query_as::<Postgres, RedemptionTally>(REDEMPTION_TALLIES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn region_breakdown(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<RegionBreakdown>, sqlx::Error> {
        query_as::<Postgres, RegionBreakdown>(REGION_BREAKDOWN_SQL)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Overview {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            users: UserCounts {
                pending: try_get_u64(row, "users_pending")?,
                approved: try_get_u64(row, "users_approved")?,
                rejected: try_get_u64(row, "users_rejected")?,
            },
            points_awarded: try_get_u64(row, "points_awarded")?,
            points_spent: try_get_u64(row, "points_spent")?,
            open_tickets: try_get_u64(row, "open_tickets")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for DealTally {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            status: try_get_enum(row, "status")?,
            count: try_get_u64(row, "count")?,
            total_value: try_get_u64(row, "total_value")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for RedemptionTally {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            status: try_get_enum(row, "status")?,
            count: try_get_u64(row, "count")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for RegionBreakdown {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            region: row.try_get("region")?,
            users: try_get_u64(row, "users")?,
            approved_deals: try_get_u64(row, "approved_deals")?,
            approved_deal_value: try_get_u64(row, "approved_deal_value")?,
            points_awarded: try_get_u64(row, "points_awarded")?,
        })
    }
}
