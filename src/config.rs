use crate::{Error, Result};
use log::LevelFilter;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Connection settings, usually read from the environment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// `DATABASE_URL`
    pub url: String,
    /// `DATABASE_MAX_CONNECTIONS`
    pub max_connections: u32,
    /// `DATABASE_MIN_CONNECTIONS`
    pub min_connections: u32,
    /// `DATABASE_CONNECT_TIMEOUT`, in seconds
    pub connect_timeout: Duration,
    /// `DATABASE_SQLX_LOGGING`
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".to_owned(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(8),
            sqlx_logging: false,
        }
    }
}

impl DatabaseConfig {
    /// Read the config from the process environment, after loading `.env` if present.
    /// Unset variables keep their default.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the config through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup("DATABASE_URL") {
            config.url = url;
        }
        if let Some(max) = parse(&lookup, "DATABASE_MAX_CONNECTIONS")? {
            config.max_connections = max;
        }
        if let Some(min) = parse(&lookup, "DATABASE_MIN_CONNECTIONS")? {
            config.min_connections = min;
        }
        if let Some(secs) = parse(&lookup, "DATABASE_CONNECT_TIMEOUT")? {
            config.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(logging) = parse(&lookup, "DATABASE_SQLX_LOGGING")? {
            config.sqlx_logging = logging;
        }
        if config.min_connections > config.max_connections {
            return Err(Error::Config(format!(
                "DATABASE_MIN_CONNECTIONS ({}) exceeds DATABASE_MAX_CONNECTIONS ({})",
                config.min_connections, config.max_connections
            )));
        }
        Ok(config)
    }

    pub fn connect_options(&self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(self.url.clone());
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(self.connect_timeout)
            .sqlx_logging(self.sqlx_logging)
            .sqlx_logging_level(LevelFilter::Debug);
        opt
    }

    /// Open a connection pool
    pub async fn connect(&self) -> Result<DatabaseConnection> {
        info!(
            max_connections = self.max_connections,
            "Connecting to {}",
            redact(&self.url)
        );
        Ok(Database::connect(self.connect_options()).await?)
    }
}

fn parse<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{key} has an invalid value `{value}`"))),
    }
}

/// Hide the password of a connection url
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme), Some(at)) if at > scheme => {
            let credentials = &url[scheme + 3..at];
            match credentials.split_once(':') {
                Some((user, _)) => format!("{}{user}:***{}", &url[..scheme + 3], &url[at..]),
                None => url.to_owned(),
            }
        }
        _ => url.to_owned(),
    }
}
