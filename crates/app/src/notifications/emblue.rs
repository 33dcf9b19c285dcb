//! EMBlue transactional email client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::notifications::{Mailer, OutboundEmail};

/// How long an authentication token is reused before asking for a new one.
const TOKEN_TTL: Duration = Duration::from_secs(50 * 60);

/// Sends through EMBlue's `SendMailExpress` operation, authenticating on demand.
#[derive(Debug)]
pub struct EmblueMailer {
    api_url: String,
    username: String,
    password: String,
    from_email: String,
    http: Client,
    token: Mutex<Option<CachedToken>>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Error)]
enum EmblueError {
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    #[error("authentication rejected with status {0}")]
    Unauthorized(StatusCode),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticateRequest<'a> {
    user: &'a str,
    pass: &'a str,
    token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticateResponse {
    token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendMailExpressRequest<'a> {
    token: &'a str,
    email: &'a str,
    subject: &'a str,
    message: &'a str,
    from: &'a str,
}

impl EmblueMailer {
    #[must_use]
    pub fn new(api_url: &str, username: &str, password: &str, from_email: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
            from_email: from_email.to_string(),
            http: Client::new(),
            token: Mutex::new(None),
        }
    }

    /// Return the cached token, authenticating again once it has expired.
    async fn token(&self) -> Result<String, EmblueError> {
        let mut cached = self.token.lock().await;
        let now = Instant::now();

        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        debug!("requesting emblue token");

        let response = self
            .http
            .post(format!("{}/Authenticate", self.api_url))
            .json(&AuthenticateRequest {
                user: &self.username,
                pass: &self.password,
                token: "",
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EmblueError::Unauthorized(response.status()));
        }

        let value = response
            .json::<AuthenticateResponse>()
            .await?
            .token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| EmblueError::UnexpectedResponse("missing token".to_string()))?;

        *cached = Some(CachedToken {
            value: value.clone(),
            expires_at: now + TOKEN_TTL,
        });

        Ok(value)
    }

    async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }

    async fn deliver(&self, email: &OutboundEmail) -> Result<(), EmblueError> {
        let token = self.token().await?;

        let response = self
            .http
            .post(format!("{}/SendMailExpress", self.api_url))
            .json(&SendMailExpressRequest {
                token: &token,
                email: &email.to,
                subject: &email.subject,
                message: &email.html,
                from: &self.from_email,
            })
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            self.invalidate_token().await;

            return Err(EmblueError::Unauthorized(status));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            return Err(EmblueError::UnexpectedResponse(format!(
                "send failed with status {status}: {body}"
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl Mailer for EmblueMailer {
    #[tracing::instrument(name = "mail.emblue.send", skip(self, email), fields(to = %email.to))]
    async fn send(&self, email: OutboundEmail) -> bool {
        match self.deliver(&email).await {
            Ok(()) => {
                info!(subject = %email.subject, "email sent");

                true
            }
            Err(e) => {
                error!(error = %e, "emblue delivery failed");

                false
            }
        }
    }
}
