use std::env;
use tracing::warn;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_JOIN_TOKEN_PREFIX: &str = "HOLESCORE";
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 100;

/// Runtime configuration, read from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string; the in-memory store is used when absent
    pub database_url: Option<String>,
    pub bind_addr: String,
    pub join_token_prefix: String,
    pub event_channel_capacity: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let event_channel_capacity = match lookup("EVENT_CHANNEL_CAPACITY") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(capacity) if capacity > 0 => capacity,
                _ => {
                    warn!(value = %raw, "Ignoring invalid EVENT_CHANNEL_CAPACITY");
                    DEFAULT_EVENT_CHANNEL_CAPACITY
                }
            },
            None => DEFAULT_EVENT_CHANNEL_CAPACITY,
        };

        Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            join_token_prefix: lookup("JOIN_TOKEN_PREFIX")
                .filter(|prefix| !prefix.is_empty() && !prefix.contains(':'))
                .unwrap_or_else(|| DEFAULT_JOIN_TOKEN_PREFIX.to_string()),
            event_channel_capacity,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
