//! Connection and run settings
//!
//! PostgreSQL credentials come from the environment (usually a sourced
//! `.env` file); the remaining knobs are validated here before any
//! connection is opened.

use crate::dataset::Table;
use sqlx::postgres::PgConnectOptions;
use std::fmt;
use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5432;

// PostgreSQL wire protocol limit on bind parameters per statement
const MAX_BIND_PARAMS: usize = 65_535;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingVar(&'static str),

    #[error("Invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("Batch size must be between 1 and {max}, got {value}")]
    BatchSize { value: usize, max: usize },
}

/// Where and as whom to connect to PostgreSQL
///
/// Expected environment variables:
/// - DB_NAME: Database name (required)
/// - DB_USER: Role to connect as (required)
/// - DB_PASSWORD: Password of that role (required)
/// - DB_HOST: Server host (optional, defaults to 127.0.0.1)
/// - DB_PORT: Server port (optional, defaults to 5432)
#[derive(Clone, PartialEq, Eq)]
pub struct PostgresSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    password: String,
    pub schema: String,
}

impl PostgresSettings {
    pub fn new(
        database: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        schema: impl Into<String>,
    ) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: database.into(),
            user: user.into(),
            password: password.into(),
            schema: schema.into(),
        }
    }

    /// Read the settings from the process environment
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if a required variable is missing, the port
    /// is not a number, or `schema` is not a plain identifier.
    pub fn from_env(schema: &str) -> Result<Self, ConfigError> {
        let required =
            |name: &'static str| std::env::var(name).map_err(|_| ConfigError::MissingVar(name));

        let mut settings = Self::new(
            required("DB_NAME")?,
            required("DB_USER")?,
            required("DB_PASSWORD")?,
            validate_schema(schema)?,
        );

        if let Ok(host) = std::env::var("DB_HOST") {
            settings.host = host;
        }
        if let Ok(port) = std::env::var("DB_PORT") {
            settings.port = port.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "DB_PORT",
                value: port.clone(),
            })?;
        }

        Ok(settings)
    }

    /// Driver options, with `search_path` pointed at the catalogue schema
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
            .options([("search_path", format!("{},public", self.schema))])
    }
}

impl fmt::Debug for PostgresSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("schema", &self.schema)
            .finish()
    }
}

/// Largest batch whose widest upsert still fits in one statement
pub fn max_batch_size() -> usize {
    MAX_BIND_PARAMS / Table::max_columns()
}

/// Check a batch size against the bind parameter limit
pub fn validate_batch_size(value: usize) -> Result<usize, ConfigError> {
    let max = max_batch_size();
    if value == 0 || value > max {
        return Err(ConfigError::BatchSize { value, max });
    }
    Ok(value)
}

/// Accept only plain SQL identifiers as schema names
pub fn validate_schema(schema: &str) -> Result<String, ConfigError> {
    let mut chars = schema.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(schema.to_string())
    } else {
        Err(ConfigError::Invalid {
            name: "schema",
            value: schema.to_string(),
        })
    }
}
