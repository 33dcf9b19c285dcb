//! Mail Config

use clap::Args;

use loyalty_app::notifications::MailSettings;

/// Email provider settings. Brevo wins when both providers are configured.
#[derive(Debug, Args)]
pub struct MailConfig {
    /// Brevo API key
    #[arg(long, env = "BREVO_API_KEY", hide_env_values = true)]
    pub brevo_api_key: Option<String>,

    /// Sender address
    #[arg(long, env = "FROM_EMAIL")]
    pub from_email: Option<String>,

    /// Public URL of the web app, used for links in emails
    #[arg(long, env = "APP_URL")]
    pub app_url: Option<String>,

    /// Fallback link root when `APP_URL` is unset
    #[arg(long, env = "BASE_URL")]
    pub base_url: Option<String>,

    /// EMBlue account username
    #[arg(long, env = "EMBLUE_USERNAME")]
    pub emblue_username: Option<String>,

    /// EMBlue account password
    #[arg(long, env = "EMBLUE_PASSWORD", hide_env_values = true)]
    pub emblue_password: Option<String>,

    /// EMBlue sender address, defaults to `FROM_EMAIL`
    #[arg(long, env = "EMBLUE_FROM_EMAIL")]
    pub emblue_from_email: Option<String>,

    /// EMBlue API root
    #[arg(long, env = "EMBLUE_API_URL")]
    pub emblue_api_url: Option<String>,
}

impl MailConfig {
    #[must_use]
    pub fn settings(&self) -> MailSettings {
        MailSettings {
            brevo_api_key: self.brevo_api_key.clone(),
            from_email: self.from_email.clone(),
            app_url: self.app_url.clone(),
            base_url: self.base_url.clone(),
            emblue_username: self.emblue_username.clone(),
            emblue_password: self.emblue_password.clone(),
            emblue_from_email: self.emblue_from_email.clone(),
            emblue_api_url: self.emblue_api_url.clone(),
        }
    }
}
