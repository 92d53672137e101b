use std::net::SocketAddr;

use sqlx::mysql::MySqlConnectOptions;

use crate::err::{Error, Maybe};

pub const DEFAULT_DB_PORT: u16 = 3306;
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Runtime settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub secret_key: String,
    pub bind_addr: SocketAddr,
    pub init_schema: bool,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub name: String,
    pub port: u16,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

impl Config {
    pub fn from_env() -> Maybe<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Every absent required key is
    /// reported together; nothing is returned from a partial set.
    pub fn from_lookup<F>(lookup: F) -> Maybe<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        // an empty password is a real credential; other keys must carry a value
        let mut required = |key: &'static str, allow_empty: bool| match lookup(key) {
            Some(value) if allow_empty || !value.is_empty() => value,
            _ => {
                missing.push(key);
                String::new()
            }
        };

        let host = required("DB_HOST", false);
        let user = required("DB_USER", false);
        let password = required("DB_PASSWORD", true);
        let name = required("DB_NAME", false);
        let secret_key = required("SECRET_KEY", false);

        if !missing.is_empty() {
            return Err(Error::MissingConfig { missing });
        }

        let port = match lookup("DB_PORT").filter(|v| !v.is_empty()) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|err| Error::InvalidConfig {
                key: "DB_PORT",
                message: format!("{}", err),
            })?,
            None => DEFAULT_DB_PORT,
        };

        let bind_addr = lookup("BIND_ADDR")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .trim()
            .parse::<SocketAddr>()
            .map_err(|err| Error::InvalidConfig {
                key: "BIND_ADDR",
                message: format!("{}", err),
            })?;

        let init_schema = lookup("DB_INIT_SCHEMA")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        Ok(Config {
            database: DatabaseConfig {
                host,
                user,
                password,
                name,
                port,
            },
            secret_key,
            bind_addr,
            init_schema,
        })
    }
}
