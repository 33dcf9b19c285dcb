//! Brevo transactional email client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};

use crate::notifications::{Mailer, OutboundEmail};

const BREVO_SEND_URL: &str = "https://api.brevo.com/v3/smtp/email";

/// Sends through Brevo's `smtp/email` endpoint.
#[derive(Debug, Clone)]
pub struct BrevoMailer {
    api_key: String,
    from_email: String,
    endpoint: String,
    http: Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRequest<'a> {
    sender: Contact<'a>,
    to: [Contact<'a>; 1],
    subject: &'a str,
    html_content: &'a str,
}

#[derive(Debug, Serialize)]
struct Contact<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

impl BrevoMailer {
    #[must_use]
    pub fn new(api_key: &str, from_email: &str) -> Self {
        Self::with_endpoint(api_key, from_email, BREVO_SEND_URL)
    }

    #[must_use]
    pub fn with_endpoint(api_key: &str, from_email: &str, endpoint: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            from_email: from_email.to_string(),
            endpoint: endpoint.to_string(),
            http: Client::new(),
        }
    }

    fn request<'a>(&'a self, email: &'a OutboundEmail) -> SendRequest<'a> {
        SendRequest {
            sender: Contact {
                email: &self.from_email,
                name: None,
            },
            to: [Contact {
                email: &email.to,
                name: email.to_name.as_deref(),
            }],
            subject: &email.subject,
            html_content: &email.html,
        }
    }
}

#[async_trait]
impl Mailer for BrevoMailer {
    #[tracing::instrument(name = "mail.brevo.send", skip(self, email), fields(to = %email.to))]
    async fn send(&self, email: OutboundEmail) -> bool {
        let response = self
            .http
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .header("accept", "application/json")
            .json(&self.request(&email))
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => {
                info!(subject = %email.subject, "email sent");

                true
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();

                error!(%status, body, "brevo rejected email");

                false
            }
            Err(e) => {
                error!(error = %e, "brevo request failed");

                false
            }
        }
    }
}
