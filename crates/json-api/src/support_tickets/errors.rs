//! Support Ticket Errors

use salvo::http::StatusError;
use tracing::error;

use loyalty_app::domain::support_tickets::SupportTicketsServiceError;

pub(crate) fn into_status_error(error: SupportTicketsServiceError) -> StatusError {
    match error {
        SupportTicketsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Ticket already exists")
        }
        SupportTicketsServiceError::NotFound => StatusError::not_found().brief("Ticket not found"),
        SupportTicketsServiceError::InvalidReference
        | SupportTicketsServiceError::MissingRequiredData
        | SupportTicketsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid ticket payload")
        }
        SupportTicketsServiceError::Forbidden => {
            StatusError::forbidden().brief("Not allowed to manage support tickets")
        }
        SupportTicketsServiceError::InvalidTransition { from, to } => {
            StatusError::unprocessable_entity()
                .brief(format!("Ticket cannot move from {from} to {to}"))
        }
        SupportTicketsServiceError::Sql(source) => {
            error!("support tickets storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
