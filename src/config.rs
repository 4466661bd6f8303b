//! Startup configuration parsed from environment variables.
//!
//! SYSTEM CONTEXT
//! ==============
//! The listen port is the only value the startup sequence itself consumes.
//! Datastore settings are read here too but belong to the connector, which
//! decides what a missing URL means.

use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_DB_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// Resolve the listen port from a raw `PORT` value.
///
/// Absent, empty, non-numeric, zero, and out-of-range values all fall back
/// to [`DEFAULT_PORT`].
#[must_use]
pub fn resolve_port(raw: Option<&str>) -> u16 {
    raw.map(str::trim)
        .and_then(|v| v.parse::<u16>().ok())
        .filter(|port| *port > 0)
        .unwrap_or(DEFAULT_PORT)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl DbConfig {
    /// Build datastore config from environment variables.
    ///
    /// Optional:
    /// - `DATABASE_URL`: connection fails at startup when absent
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `DB_ACQUIRE_TIMEOUT_SECS`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build datastore config from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());
        let max_connections = lookup("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);
        let acquire_secs = lookup("DB_ACQUIRE_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_DB_ACQUIRE_TIMEOUT_SECS);

        Self { database_url, max_connections, acquire_timeout: Duration::from_secs(acquire_secs) }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
