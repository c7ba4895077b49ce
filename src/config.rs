use std::time::Duration;

use clap::Args;
use log::debug;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

/// PostgreSQL connection and pool settings.
///
/// Every field can be given on the command line or through the environment
/// (a `.env` file is loaded by the binaries before parsing).
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// Database host
    #[arg(long = "db-host", env = "DB_HOST", default_value = "localhost")]
    pub host: String,

    /// Database port
    #[arg(long = "db-port", env = "DB_PORT", default_value_t = 5432)]
    pub port: u16,

    /// Database name
    #[arg(long = "db-name", env = "DB_NAME")]
    pub database: Option<String>,

    /// Database user
    #[arg(long = "db-user", env = "DB_USER")]
    pub user: Option<String>,

    /// Database password
    #[arg(long = "db-password", env = "DB_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Connections kept open by the pool
    #[arg(long = "db-pool-min", env = "DB_POOL_MIN", default_value_t = 2)]
    pub min_connections: u32,

    /// Upper bound of pooled connections
    #[arg(long = "db-pool-max", env = "DB_POOL_MAX", default_value_t = 10)]
    pub max_connections: u32,

    /// Idle time in milliseconds before a pooled connection is closed
    #[arg(long = "db-idle-timeout-ms", env = "DB_IDLE_TIMEOUT_MS", default_value_t = 30_000)]
    pub idle_timeout_ms: u64,

    /// Time in milliseconds to wait for a pooled connection
    #[arg(long = "db-connect-timeout-ms", env = "DB_CONNECT_TIMEOUT_MS", default_value_t = 2_000)]
    pub connect_timeout_ms: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: None,
            user: None,
            password: None,
            min_connections: 2,
            max_connections: 10,
            idle_timeout_ms: 30_000,
            connect_timeout_ms: 2_000,
        }
    }
}

impl DbConfig {
    /// Connection options; unset name/user/password fall back to libpq's `PG*` variables.
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new().host(&self.host).port(self.port);

        if let Some(database) = &self.database {
            options = options.database(database);
        }
        if let Some(user) = &self.user {
            options = options.username(user);
        }
        if let Some(password) = &self.password {
            options = options.password(password);
        }

        options
    }

    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .min_connections(self.min_connections)
            .max_connections(self.max_connections)
            .idle_timeout(Duration::from_millis(self.idle_timeout_ms))
            .acquire_timeout(Duration::from_millis(self.connect_timeout_ms))
            .after_connect(|_conn, _meta| {
                Box::pin(async move {
                    debug!("New client connected to the pool");
                    Ok(())
                })
            })
    }

    /// Database name for display, never the password.
    pub fn display_name(&self) -> &str {
        self.database.as_deref().unwrap_or("not set")
    }
}
