//! Support Tickets Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    rows::{try_get_enum, try_get_optional_timestamp, try_get_timestamp},
    support_tickets::{
        data::NewTicket,
        records::{TicketRecord, TicketStatus, TicketUuid},
    },
    users::records::UserUuid,
};

const CREATE_TICKET_SQL: &str = include_str!("sql/create_ticket.sql");
const GET_TICKET_FOR_UPDATE_SQL: &str = include_str!("sql/get_ticket_for_update.sql");
const LIST_TICKETS_FOR_USER_SQL: &str = include_str!("sql/list_tickets_for_user.sql");
const LIST_TICKETS_SQL: &str = include_str!("sql/list_tickets.sql");
const UPDATE_STATUS_SQL: &str = include_str!("sql/update_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgSupportTicketsRepository;

impl PgSupportTicketsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_ticket(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
        ticket: NewTicket,
    ) -> Result<TicketRecord, sqlx::Error> {
        query_as::<Postgres, TicketRecord>(CREATE_TICKET_SQL)
            .bind(TicketUuid::new())
            .bind(owner)
            .bind(ticket.subject)
            .bind(ticket.message)
            .bind(ticket.priority.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_ticket_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ticket: TicketUuid,
    ) -> Result<TicketRecord, sqlx::Error> {
        query_as::<Postgres, TicketRecord>(GET_TICKET_FOR_UPDATE_SQL)
            .bind(ticket)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_tickets_for_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
    ) -> Result<Vec<TicketRecord>, sqlx::Error> {
        query_as::<Postgres, TicketRecord>(LIST_TICKETS_FOR_USER_SQL)
            .bind(owner)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn list_tickets(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        status: Option<TicketStatus>,
    ) -> Result<Vec<TicketRecord>, sqlx::Error> {
        query_as::<Postgres, TicketRecord>(LIST_TICKETS_SQL)
            .bind(status.map(TicketStatus::as_str))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        ticket: TicketUuid,
        status: TicketStatus,
    ) -> Result<TicketRecord, sqlx::Error> {
        query_as::<Postgres, TicketRecord>(UPDATE_STATUS_SQL)
            .bind(ticket)
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for TicketRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            user_uuid: row.try_get("user_uuid")?,
            subject: row.try_get("subject")?,
            message: row.try_get("message")?,
            priority: try_get_enum(row, "priority")?,
            status: try_get_enum(row, "status")?,
            resolved_at: try_get_optional_timestamp(row, "resolved_at")?,
            closed_at: try_get_optional_timestamp(row, "closed_at")?,
            created_at: try_get_timestamp(row, "created_at")?,
            updated_at: try_get_timestamp(row, "updated_at")?,
        })
    }
}
