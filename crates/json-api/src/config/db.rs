//! Database Config

use clap::Args;

use loyalty_app::database::{DEFAULT_MAX_CONNECTIONS, DatabaseSettings};

/// Database settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Upper bound on pooled connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub database_max_connections: u32,

    /// Apply pending migrations before serving
    #[arg(long, env = "DATABASE_MIGRATE_ON_START", default_value_t = false)]
    pub migrate_on_start: bool,
}

impl DatabaseConfig {
    #[must_use]
    pub fn settings(&self) -> DatabaseSettings {
        DatabaseSettings {
            url: self.database_url.clone(),
            max_connections: self.database_max_connections,
            migrate_on_start: self.migrate_on_start,
        }
    }
}
