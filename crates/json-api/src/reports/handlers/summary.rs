//! Report Summary Handler

use std::sync::Arc;

use salvo::prelude::*;

use loyalty_app::domain::users::records::Role;

use crate::{
    extensions::*,
    reports::{errors::into_status_error, models::ReportSummaryResponse},
    state::State,
};

/// Report Summary Handler
///
/// Programme-wide totals with a per-region breakdown.
#[endpoint(
    tags("admin"),
    summary = "Programme Report",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ReportSummaryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_with_role(Role::SuperAdmin)?;

    let summary = state
        .app
        .reports
        .summary(principal)
        .await
        .map_err(into_status_error)?;

    Ok(Json(summary.into()))
}
