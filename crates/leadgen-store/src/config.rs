//! # Store Configuration
//!
//! Database settings, loaded from environment variables.

use leadgen_core::LeadError;
use std::env;

/// Default pool size
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Postgres connection configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Connection string (postgres://...)
    pub database_url: String,

    /// Maximum pool connections
    pub max_connections: u32,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `DATABASE_URL`
    ///
    /// Optional:
    /// - `DATABASE_MAX_CONNECTIONS` (default 10)
    pub fn from_env() -> Result<Self, LeadError> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| LeadError::Configuration("DATABASE_URL not set".to_string()))?;

        if !database_url.starts_with("postgres://") && !database_url.starts_with("postgresql://")
        {
            return Err(LeadError::Configuration(
                "DATABASE_URL must be a postgres:// connection string".to_string(),
            ));
        }

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        Ok(Self {
            database_url,
            max_connections,
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Builder: set pool size
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }
}
