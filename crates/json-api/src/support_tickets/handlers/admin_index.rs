//! Admin Support Ticket Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use loyalty_app::domain::{support_tickets::data::TicketFilter, users::records::Role};

use crate::{
    extensions::*,
    state::State,
    support_tickets::{
        errors::into_status_error,
        models::{TicketsResponse, parse_status},
    },
};

/// Admin Support Ticket Index Handler
#[endpoint(
    tags("admin"),
    summary = "List Tickets",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<TicketsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_with_role(Role::Admin)?;

    let filter = TicketFilter {
        status: parse_status(status.into_inner())?,
    };

    let tickets = state
        .app
        .support_tickets
        .list_tickets(principal, filter)
        .await
        .map_err(into_status_error)?;

    Ok(Json(TicketsResponse {
        tickets: tickets.into_iter().map(Into::into).collect(),
    }))
}
