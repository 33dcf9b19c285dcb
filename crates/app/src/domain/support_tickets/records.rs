//! Support Ticket Records

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use jiff::Timestamp;

use crate::{
    domain::{UnknownVariant, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Ticket UUID
pub type TicketUuid = TypedUuid<TicketRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TicketPriority {
    Low,
    #[default]
    Normal,
    High,
}

impl TicketPriority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

impl FromStr for TicketPriority {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            _ => Err(UnknownVariant::new("ticket priority", value)),
        }
    }
}

impl Display for TicketPriority {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Open, Self::InProgress | Self::Closed)
                | (Self::InProgress, Self::Resolved | Self::Closed)
                | (Self::Resolved, Self::Closed)
        )
    }
}

impl FromStr for TicketStatus {
    type Err = UnknownVariant;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            _ => Err(UnknownVariant::new("ticket status", value)),
        }
    }
}

impl Display for TicketStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Support Ticket Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRecord {
    pub uuid: TicketUuid,
    pub user_uuid: UserUuid,
    pub subject: String,
    pub message: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
    pub resolved_at: Option<Timestamp>,
    pub closed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
