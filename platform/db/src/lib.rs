//! Database primitives: environment-driven settings and pool construction.

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};
use thiserror::Error;
use tracing::{info, warn};

/// Shared pool alias. sea-orm pools connections internally.
pub type DbPool = DatabaseConnection;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database url missing (set {0})")]
    MissingUrl(String),
    #[error("invalid value for {key}: {value}")]
    InvalidSetting { key: &'static str, value: String },
    #[error("failed to connect to database")]
    Connect(#[source] DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

const DEFAULT_URL_KEY: &str = "DATABASE_URL";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Connection settings read from the environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseSettings {
    env_key: String,
    url: Option<String>,
    pub max_connections: u32,
    pub connect_timeout: Duration,
    pub sql_logging: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self::new(DEFAULT_URL_KEY)
    }
}

impl DatabaseSettings {
    pub fn new(env_key: impl Into<String>) -> Self {
        Self {
            env_key: env_key.into(),
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            sql_logging: false,
        }
    }

    /// Build settings from an arbitrary key lookup. `DATABASE_URL` itself is
    /// resolved lazily by [`DatabaseSettings::database_url`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DbResult<Self> {
        let mut settings = Self::default();
        settings.url = lookup(&settings.env_key);
        if let Some(raw) = lookup("DATABASE_MAX_CONNECTIONS") {
            settings.max_connections =
                raw.trim().parse().map_err(|_| DbError::InvalidSetting {
                    key: "DATABASE_MAX_CONNECTIONS",
                    value: raw.clone(),
                })?;
        }
        if let Some(raw) = lookup("DATABASE_CONNECT_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| DbError::InvalidSetting {
                key: "DATABASE_CONNECT_TIMEOUT_SECS",
                value: raw.clone(),
            })?;
            settings.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup("DATABASE_SQL_LOG") {
            settings.sql_logging = matches!(raw.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        Ok(settings)
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn database_url(&self) -> DbResult<&str> {
        self.url
            .as_deref()
            .ok_or_else(|| DbError::MissingUrl(self.env_key.clone()))
    }

    fn connect_options(&self) -> DbResult<ConnectOptions> {
        let mut options = ConnectOptions::new(self.database_url()?.to_string());
        options
            .max_connections(self.max_connections)
            .connect_timeout(self.connect_timeout)
            .sqlx_logging(self.sql_logging);
        Ok(options)
    }
}

/// Open a pool using the given settings.
pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    let options = settings.connect_options()?;
    let pool = Database::connect(options).await.map_err(DbError::Connect)?;
    info!(
        backend = ?pool.get_database_backend(),
        max_connections = settings.max_connections,
        "database pool ready"
    );
    Ok(pool)
}

/// Round-trip a trivial query. Used by health probes.
pub async fn ping(pool: &DbPool) -> bool {
    let backend = pool.get_database_backend();
    match pool
        .execute(Statement::from_string(backend, "SELECT 1".to_string()))
        .await
    {
        Ok(_) => true,
        Err(err) => {
            warn!(error = %err, "database ping failed");
            false
        }
    }
}
