//! Support Ticket Index Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    extensions::*,
    state::State,
    support_tickets::{errors::into_status_error, models::TicketsResponse},
};

/// Support Ticket Index Handler
#[endpoint(
    tags("support"),
    summary = "List My Tickets",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<TicketsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let tickets = state
        .app
        .support_tickets
        .list_tickets_for_user(principal.user_uuid)
        .await
        .map_err(into_status_error)?;

    Ok(Json(TicketsResponse {
        tickets: tickets.into_iter().map(Into::into).collect(),
    }))
}
