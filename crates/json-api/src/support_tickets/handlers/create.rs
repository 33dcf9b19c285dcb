//! Create Support Ticket Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use tracing::info;

use crate::{
    extensions::*,
    observability::{DomainEvent, record_event},
    state::State,
    support_tickets::{
        errors::into_status_error,
        models::{CreateTicketRequest, TicketResponse},
    },
};

/// Create Support Ticket Handler
///
/// Opens a ticket and notifies the support inbox.
#[endpoint(
    tags("support"),
    summary = "Open Ticket",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Ticket opened"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateTicketRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<TicketResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let ticket = json.into_inner().into_new_ticket()?;

    let ticket = state
        .app
        .support_tickets
        .create_ticket(principal.user_uuid, ticket)
        .await
        .map_err(into_status_error)?;

    info!(ticket_uuid = %ticket.uuid, priority = ticket.priority.as_str(), "opened support ticket");

    record_event(DomainEvent::TicketOpened);

    res.status_code(StatusCode::CREATED);

    Ok(Json(ticket.into()))
}
