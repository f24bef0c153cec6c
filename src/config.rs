use anyhow::{Context, Result};

/// `DATABASE_URL` value that selects the process-local store instead of Postgres.
pub const MEMORY_STORE_URL: &str = "memory://";

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string, or [`MEMORY_STORE_URL`].
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            server_host: optional("SERVER_HOST", "0.0.0.0"),
            server_port: parse_port(&optional("PORT", "3000"))?,
        })
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with(MEMORY_STORE_URL)
    }
}

fn parse_port(raw: &str) -> Result<u16> {
    raw.trim()
        .parse()
        .with_context(|| format!("PORT must be a valid port number, got: {raw:?}"))
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("missing required env var: {key}"))
}

fn optional(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
