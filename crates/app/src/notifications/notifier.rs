//! Domain event notifications.

use std::{fmt, sync::Arc};

use crate::{
    domain::{
        deals::records::DealRecord, redemptions::records::RedemptionRecord,
        support_tickets::records::TicketRecord, users::records::UserRecord,
    },
    notifications::{Mailer, OutboundEmail, templates, templates::Rendered},
};

/// Renders notification templates for domain records and hands them to the mailer.
#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    link_root: String,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("link_root", &self.link_root)
            .finish_non_exhaustive()
    }
}

impl Notifier {
    #[must_use]
    pub fn new(mailer: Arc<dyn Mailer>, link_root: impl Into<String>) -> Self {
        Self {
            mailer,
            link_root: link_root.into(),
        }
    }

    async fn deliver(&self, user: &UserRecord, rendered: Rendered) -> bool {
        self.mailer
            .send(OutboundEmail {
                to: user.email.clone(),
                to_name: Some(user.display_name()),
                subject: rendered.subject,
                html: rendered.html,
            })
            .await
    }

    pub async fn invite(&self, user: &UserRecord, token: &str) -> bool {
        self.deliver(
            user,
            templates::invite(&self.link_root, token, user.role.as_str()),
        )
        .await
    }

    pub async fn account_approved(&self, user: &UserRecord) -> bool {
        self.deliver(
            user,
            templates::account_approved(&user.display_name(), &self.link_root),
        )
        .await
    }

    pub async fn account_rejected(&self, user: &UserRecord) -> bool {
        self.deliver(user, templates::account_rejected(&user.display_name()))
            .await
    }

    pub async fn password_reset(&self, user: &UserRecord, token: &str) -> bool {
        self.deliver(
            user,
            templates::password_reset(&user.display_name(), &self.link_root, token),
        )
        .await
    }

    pub async fn deal_approved(&self, owner: &UserRecord, deal: &DealRecord) -> bool {
        self.deliver(
            owner,
            templates::deal_approved(
                &owner.display_name(),
                &deal.customer_name,
                deal.points_earned,
            ),
        )
        .await
    }

    pub async fn deal_rejected(&self, owner: &UserRecord, deal: &DealRecord) -> bool {
        self.deliver(
            owner,
            templates::deal_rejected(
                &owner.display_name(),
                &deal.customer_name,
                deal.rejection_reason.as_deref(),
            ),
        )
        .await
    }

    pub async fn redemption_status(
        &self,
        owner: &UserRecord,
        reward_name: &str,
        redemption: &RedemptionRecord,
    ) -> bool {
        self.deliver(
            owner,
            templates::redemption_status(
                &owner.display_name(),
                reward_name,
                redemption.status.as_str(),
                redemption.tracking_number.as_deref(),
            ),
        )
        .await
    }

    pub async fn ticket_received(&self, owner: &UserRecord, ticket: &TicketRecord) -> bool {
        self.deliver(
            owner,
            templates::ticket_received(
                &owner.display_name(),
                &ticket.subject,
                &ticket.uuid.to_string(),
            ),
        )
        .await
    }
}
