use std::env;
use std::time::Duration;

use anyhow::{Context, anyhow};

type Result<T> = anyhow::Result<T>;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
    pub sqlx_logging: bool,
}

impl StoreConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            sqlx_logging: false,
        }
    }

    /// Reads `DATABASE_URL`, `COURSEDB_MAX_CONNECTIONS`,
    /// `COURSEDB_CONNECT_TIMEOUT_SECS` and `COURSEDB_SQLX_LOGGING`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| anyhow!("DATABASE_URL is not set"))?;
        let mut config = Self::new(database_url);

        if let Some(raw) = lookup("COURSEDB_MAX_CONNECTIONS") {
            config.max_connections = raw
                .parse()
                .with_context(|| format!("invalid COURSEDB_MAX_CONNECTIONS: {raw}"))?;
        }

        if let Some(raw) = lookup("COURSEDB_CONNECT_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("invalid COURSEDB_CONNECT_TIMEOUT_SECS: {raw}"))?;
            config.connect_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("COURSEDB_SQLX_LOGGING") {
            config.sqlx_logging = match raw.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(anyhow!("invalid COURSEDB_SQLX_LOGGING: {raw}")),
            };
        }

        Ok(config)
    }
}
