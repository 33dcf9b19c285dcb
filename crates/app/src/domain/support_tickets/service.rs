//! Support tickets service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    auth::Principal,
    database::Db,
    domain::{
        support_tickets::{
            data::{NewTicket, TicketFilter},
            errors::SupportTicketsServiceError,
            records::{TicketRecord, TicketStatus, TicketUuid},
            repository::PgSupportTicketsRepository,
        },
        users::{
            records::{Role, UserUuid},
            repository::PgUsersRepository,
        },
    },
    notifications::Notifier,
};

#[derive(Debug, Clone)]
pub struct PgSupportTicketsService {
    db: Db,
    repository: PgSupportTicketsRepository,
    users: PgUsersRepository,
    notifier: Notifier,
}

impl PgSupportTicketsService {
    #[must_use]
    pub fn new(db: Db, notifier: Notifier) -> Self {
        Self {
            db,
            repository: PgSupportTicketsRepository::new(),
            users: PgUsersRepository::new(),
            notifier,
        }
    }
}

#[async_trait]
impl SupportTicketsService for PgSupportTicketsService {
    #[tracing::instrument(name = "support_tickets.service.create_ticket", skip(self, ticket), fields(%owner, priority = %ticket.priority), err)]
    async fn create_ticket(
        &self,
        owner: UserUuid,
        ticket: NewTicket,
    ) -> Result<TicketRecord, SupportTicketsServiceError> {
        let subject = ticket.subject.trim().to_string();
        let message = ticket.message.trim().to_string();

        if subject.is_empty() || message.is_empty() {
            return Err(SupportTicketsServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let user = self.users.get_user(&mut tx, owner).await?;

        let created = self
            .repository
            .create_ticket(
                &mut tx,
                owner,
                NewTicket {
                    subject,
                    message,
                    priority: ticket.priority,
                },
            )
            .await?;

        tx.commit().await?;

        info!(ticket_uuid = %created.uuid, "support ticket opened");

        self.notifier.ticket_received(&user, &created).await;

        Ok(created)
    }

    async fn list_tickets_for_user(
        &self,
        owner: UserUuid,
    ) -> Result<Vec<TicketRecord>, SupportTicketsServiceError> {
        let mut tx = self.db.begin().await?;

        let tickets = self.repository.list_tickets_for_user(&mut tx, owner).await?;

        tx.commit().await?;

        Ok(tickets)
    }

    async fn list_tickets(
        &self,
        actor: &Principal,
        filter: TicketFilter,
    ) -> Result<Vec<TicketRecord>, SupportTicketsServiceError> {
        actor.require_role(Role::Admin)?;

        let mut tx = self.db.begin().await?;

        let tickets = self.repository.list_tickets(&mut tx, filter.status).await?;

        tx.commit().await?;

        Ok(tickets)
    }

    #[tracing::instrument(name = "support_tickets.service.update_ticket_status", skip(self, actor), fields(actor = %actor.user_uuid), err)]
    async fn update_ticket_status(
        &self,
        actor: &Principal,
        ticket: TicketUuid,
        status: TicketStatus,
    ) -> Result<TicketRecord, SupportTicketsServiceError> {
        actor.require_role(Role::Admin)?;

        let mut tx = self.db.begin().await?;

        let existing = self.repository.get_ticket_for_update(&mut tx, ticket).await?;

        if !existing.status.can_transition_to(status) {
            return Err(SupportTicketsServiceError::InvalidTransition {
                from: existing.status.to_string(),
                to: status.to_string(),
            });
        }

        let updated = self.repository.update_status(&mut tx, ticket, status).await?;

        tx.commit().await?;

        info!(ticket_uuid = %updated.uuid, from = %existing.status, to = %updated.status, "support ticket status changed");

        Ok(updated)
    }
}

#[automock]
#[async_trait]
pub trait SupportTicketsService: Send + Sync {
    /// Open a ticket and acknowledge it by email.
    async fn create_ticket(
        &self,
        owner: UserUuid,
        ticket: NewTicket,
    ) -> Result<TicketRecord, SupportTicketsServiceError>;

    async fn list_tickets_for_user(
        &self,
        owner: UserUuid,
    ) -> Result<Vec<TicketRecord>, SupportTicketsServiceError>;

    async fn list_tickets(
        &self,
        actor: &Principal,
        filter: TicketFilter,
    ) -> Result<Vec<TicketRecord>, SupportTicketsServiceError>;

    async fn update_ticket_status(
        &self,
        actor: &Principal,
        ticket: TicketUuid,
        status: TicketStatus,
    ) -> Result<TicketRecord, SupportTicketsServiceError>;
}
