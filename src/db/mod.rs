//! PostgreSQL connector used by the startup sequence.
//!
//! SYSTEM CONTEXT
//! ==============
//! Startup connects through this module before the listener is bound. The
//! pool it returns is handed to the HTTP server as shared state.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::config::DbConfig;
use crate::startup::{BoxError, DatastoreConnector};

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("DATABASE_URL not set")]
    MissingUrl,

    #[error("{0}")]
    Connect(#[from] sqlx::Error),
}

pub struct PgConnector {
    config: DbConfig,
}

impl PgConnector {
    #[must_use]
    pub fn new(config: DbConfig) -> Self {
        Self { config }
    }

    /// Open the connection pool, waiting for the first connection.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::MissingUrl`] when no URL is configured, or the sqlx
    /// error when the server is unreachable, rejects credentials, or times out.
    pub async fn init_pool(&self) -> Result<PgPool, DbError> {
        let url = self.config.database_url.as_deref().ok_or(DbError::MissingUrl)?;

        let pool = PgPoolOptions::new()
            .max_connections(self.config.max_connections)
            .acquire_timeout(self.config.acquire_timeout)
            .connect(url)
            .await?;

        info!(max_connections = self.config.max_connections, "database connected");
        Ok(pool)
    }
}

#[async_trait]
impl DatastoreConnector for PgConnector {
    type Handle = PgPool;

    async fn connect(&self) -> Result<PgPool, BoxError> {
        Ok(self.init_pool().await?)
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
