//! Support ticket request and response bodies.

use std::string::ToString;

use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use loyalty_app::domain::support_tickets::{
    data::NewTicket,
    records::{TicketPriority, TicketRecord, TicketStatus},
};

use crate::extensions::*;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TicketResponse {
    pub uuid: Uuid,
    pub user_uuid: Uuid,
    pub subject: String,
    pub message: String,

    /// `low`, `normal` or `high`
    pub priority: String,

    /// `open`, `in_progress`, `resolved` or `closed`
    pub status: String,
    pub resolved_at: Option<String>,
    pub closed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<TicketRecord> for TicketResponse {
    fn from(ticket: TicketRecord) -> Self {
        TicketResponse {
            uuid: ticket.uuid.into(),
            user_uuid: ticket.user_uuid.into(),
            subject: ticket.subject,
            message: ticket.message,
            priority: ticket.priority.as_str().to_string(),
            status: ticket.status.as_str().to_string(),
            resolved_at: ticket.resolved_at.as_ref().map(ToString::to_string),
            closed_at: ticket.closed_at.as_ref().map(ToString::to_string),
            created_at: ticket.created_at.to_string(),
            updated_at: ticket.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TicketsResponse {
    pub tickets: Vec<TicketResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateTicketRequest {
    pub subject: String,
    pub message: String,

    /// Defaults to `normal`
    pub priority: Option<String>,
}

impl CreateTicketRequest {
    pub(crate) fn into_new_ticket(self) -> Result<NewTicket, StatusError> {
        Ok(NewTicket {
            subject: self.subject,
            message: self.message,
            priority: self
                .priority
                .as_deref()
                .map(str::parse::<TicketPriority>)
                .transpose()
                .or_400("invalid priority")?
                .unwrap_or_default(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateTicketRequest {
    pub status: String,
}

pub(crate) fn parse_status(value: Option<String>) -> Result<Option<TicketStatus>, StatusError> {
    value
        .as_deref()
        .map(str::parse::<TicketStatus>)
        .transpose()
        .or_400("invalid status filter")
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn priority_defaults_to_normal() -> TestResult {
        let ticket = CreateTicketRequest {
            subject: "Missing points".to_string(),
            message: "My March deal shows zero".to_string(),
            priority: None,
        }
        .into_new_ticket()?;

        assert_eq!(ticket.priority, TicketPriority::Normal);

        Ok(())
    }

    #[test]
    fn unknown_priority_is_rejected() {
        let ticket = CreateTicketRequest {
            subject: "Missing points".to_string(),
            message: "My March deal shows zero".to_string(),
            priority: Some("urgent".to_string()),
        }
        .into_new_ticket();

        assert!(ticket.is_err(), "urgent is not a priority");
    }
}
