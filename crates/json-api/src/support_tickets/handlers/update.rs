//! Update Support Ticket Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use loyalty_app::domain::{support_tickets::records::TicketStatus, users::records::Role};

use crate::{
    extensions::*,
    state::State,
    support_tickets::{
        errors::into_status_error,
        models::{TicketResponse, UpdateTicketRequest},
    },
};

/// Update Support Ticket Handler
#[endpoint(
    tags("admin"),
    summary = "Update Ticket Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Ticket updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Ticket not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Transition not allowed"),
    ),
)]
pub(crate) async fn handler(
    ticket: PathParam<Uuid>,
    json: JsonBody<UpdateTicketRequest>,
    depot: &mut Depot,
) -> Result<Json<TicketResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_with_role(Role::Admin)?;
    let status = json.into_inner().status.parse::<TicketStatus>().or_400("invalid status")?;

    let ticket = state
        .app
        .support_tickets
        .update_ticket_status(principal, ticket.into_inner().into(), status)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ticket.into()))
}
