//! Connection parameters for the database collaborator.
//!
//! The gateway client itself never touches the database; the binary only
//! resolves and checks these settings so a misconfigured deployment fails
//! before any query is sent.

use std::env;
use std::fmt;

use crate::errors::{GatewayError, GatewayResult};

const REQUIRED_VARS: [&str; 5] = ["PG_HOST", "PG_PORT", "PG_USER", "PG_PASS", "PG_NAME"];

/// Five named connection parameters for the Postgres collaborator
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl DatabaseConfig {
    /// Reads `PG_HOST`, `PG_PORT`, `PG_USER`, `PG_PASS` and `PG_NAME` from the environment
    pub fn from_env() -> GatewayResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> GatewayResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let values: Vec<String> = REQUIRED_VARS
            .iter()
            .map(|key| lookup(key).unwrap_or_default())
            .collect();

        if values.iter().any(|v| v.is_empty()) {
            return Err(GatewayError::ConfigError(format!(
                "missing one or more required environment variables ({})",
                REQUIRED_VARS.join(", ")
            )));
        }

        let port = values[1].trim().parse::<u16>().map_err(|_| {
            GatewayError::ConfigError(format!("PG_PORT is not a valid port: {}", values[1]))
        })?;

        Ok(Self {
            host: values[0].clone(),
            port,
            user: values[2].clone(),
            password: values[3].clone(),
            database: values[4].clone(),
        })
    }

    /// libpq-style connection string
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={} sslmode=disable",
            self.host, self.port, self.user, self.password, self.database
        )
    }
}

impl fmt::Display for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "postgres://{}:***@{}:{}/{}",
            self.user, self.host, self.port, self.database
        )
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}
