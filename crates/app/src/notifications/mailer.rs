//! Mailer abstraction and provider selection.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{info, warn};

use crate::notifications::{BrevoMailer, EmblueMailer};

/// Default EMBlue API root.
pub const DEFAULT_EMBLUE_API_URL: &str = "https://api.embluemail.com/Services/Emblue3Service.svc/json";

/// A rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub to_name: Option<String>,
    pub subject: String,
    pub html: String,
}

#[automock]
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver one email. Returns `false` when the provider refused it or could not be reached.
    async fn send(&self, email: OutboundEmail) -> bool;
}

/// Used when no provider credentials are configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, email: OutboundEmail) -> bool {
        warn!(
            to = %email.to,
            subject = %email.subject,
            "email delivery is not configured, dropping message"
        );

        false
    }
}

/// Provider credentials and link roots.
#[derive(Debug, Clone, Default)]
pub struct MailSettings {
    pub brevo_api_key: Option<String>,
    pub from_email: Option<String>,
    pub app_url: Option<String>,
    pub base_url: Option<String>,
    pub emblue_username: Option<String>,
    pub emblue_password: Option<String>,
    pub emblue_from_email: Option<String>,
    pub emblue_api_url: Option<String>,
}

impl MailSettings {
    /// Root URL for links in emails: `APP_URL`, falling back to `BASE_URL`.
    #[must_use]
    pub fn link_root(&self) -> String {
        self.app_url
            .as_deref()
            .or(self.base_url.as_deref())
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_default()
    }
}

/// Pick the configured provider: Brevo when an API key and sender are set,
/// otherwise EMBlue when its credentials are set, otherwise [`DisabledMailer`].
#[must_use]
pub fn build_mailer(settings: &MailSettings) -> Arc<dyn Mailer> {
    if let (Some(api_key), Some(from)) = (
        non_empty(settings.brevo_api_key.as_deref()),
        non_empty(settings.from_email.as_deref()),
    ) {
        info!(provider = "brevo", "email delivery enabled");

        return Arc::new(BrevoMailer::new(api_key, from));
    }

    if let (Some(username), Some(password), Some(from)) = (
        non_empty(settings.emblue_username.as_deref()),
        non_empty(settings.emblue_password.as_deref()),
        non_empty(
            settings
                .emblue_from_email
                .as_deref()
                .or(settings.from_email.as_deref()),
        ),
    ) {
        info!(provider = "emblue", "email delivery enabled");

        let api_url = non_empty(settings.emblue_api_url.as_deref())
            .unwrap_or(DEFAULT_EMBLUE_API_URL);

        return Arc::new(EmblueMailer::new(api_url, username, password, from));
    }

    info!("no email provider configured");

    Arc::new(DisabledMailer)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
