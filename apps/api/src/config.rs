use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Connection settings for the PostgreSQL pool.
#[derive(Clone)]
pub struct DbSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub statement_timeout: Duration,
    pub acquire_timeout: Duration,
    pub max_connections: u32,
}

// Password is never printed.
impl fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("statement_timeout", &self.statement_timeout)
            .field("acquire_timeout", &self.acquire_timeout)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// Application configuration loaded from environment variables.
/// Every variable has a default except the completion API key, which is optional.
#[derive(Clone)]
pub struct Config {
    pub db: DbSettings,
    pub run_migrations: bool,
    pub openai_api_key: Option<String>,
    /// Shown on the root banner only.
    pub api_base_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("db", &self.db)
            .field("run_migrations", &self.run_migrations)
            .field(
                "openai_api_key",
                &self.openai_api_key.as_ref().map(|_| "***"),
            )
            .field("api_base_url", &self.api_base_url)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let db = DbSettings {
            host: get("DB_HOST", "localhost"),
            port: parse_var(&lookup, "DB_PORT", 5432)?,
            user: get("DB_USER", "reviewsuser"),
            password: get("DB_PASSWORD", "reviewspass"),
            database: get("DB_NAME", "googlemaps"),
            statement_timeout: Duration::from_secs(parse_var(
                &lookup,
                "DB_STATEMENT_TIMEOUT_SECS",
                60,
            )?),
            acquire_timeout: Duration::from_secs(parse_var(
                &lookup,
                "DB_ACQUIRE_TIMEOUT_SECS",
                5,
            )?),
            max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", 10)?,
        };

        if db.max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }

        Ok(Config {
            db,
            run_migrations: parse_var(&lookup, "DB_RUN_MIGRATIONS", false)?,
            openai_api_key: lookup("OPENAI_API_KEY").filter(|key| !key.trim().is_empty()),
            api_base_url: get("API_BASE_URL", "http://localhost:8000"),
            port: parse_var(&lookup, "PORT", 8000)?,
            rust_log: get("RUST_LOG", "info"),
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
