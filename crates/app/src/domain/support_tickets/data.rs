//! Support Ticket Data

use crate::domain::support_tickets::records::{TicketPriority, TicketStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub subject: String,
    pub message: String,
    pub priority: TicketPriority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
}
