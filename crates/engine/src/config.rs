//! Engine configuration loaded from environment variables.

use std::time::Duration;

/// Engine configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `STORE_TIMEOUT_MS` — timeout around persistence calls in milliseconds
///   (default: `5000`)
/// - `PAGE_SIZE` — default page size for cursors (default: `20`)
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Every persistence call is bounded by this timeout; expiry surfaces
    /// as `StoreUnavailable`.
    pub store_timeout: Duration,

    /// Default number of records per cursor page.
    pub page_size: usize,
}

impl EngineConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            store_timeout: std::env::var("STORE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.store_timeout),
            page_size: std::env::var("PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(defaults.page_size),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store_timeout: Duration::from_millis(5000),
            page_size: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = EngineConfig::default();
        assert_eq!(config.store_timeout, Duration::from_millis(5000));
        assert_eq!(config.page_size, 20);
    }
}
