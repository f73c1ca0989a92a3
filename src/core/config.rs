use std::env;
use std::time::Duration;

const DEFAULT_FLUSH_INTERVAL_MS: u64 = 250;
const DEFAULT_MAX_PENDING: usize = 16;
/// A zero interval would make the idle writer spin on `recv_timeout`.
pub const MIN_FLUSH_INTERVAL: Duration = Duration::from_millis(1);

/// Controls how the background writer batches persistence writes.
///
/// Override via env vars:
/// - `BASKET_FLUSH_MS=100` flush interval in milliseconds
/// - `BASKET_MAX_PENDING=32` buffered writes before a forced flush
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceConfig {
    pub flush_interval: Duration,
    pub max_pending: usize,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            flush_interval: Duration::from_millis(DEFAULT_FLUSH_INTERVAL_MS),
            max_pending: DEFAULT_MAX_PENDING,
        }
    }
}

impl PersistenceConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_values(
            env::var("BASKET_FLUSH_MS").ok().as_deref(),
            env::var("BASKET_MAX_PENDING").ok().as_deref(),
        )
    }

    fn from_values(flush_ms: Option<&str>, max_pending: Option<&str>) -> Self {
        let defaults = Self::default();

        let flush_interval = flush_ms
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.flush_interval);

        let max_pending = max_pending
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(defaults.max_pending);

        Self {
            flush_interval,
            max_pending,
        }
    }

    /// Intervals below `MIN_FLUSH_INTERVAL` are raised to it.
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval.max(MIN_FLUSH_INTERVAL);
        self
    }

    pub fn with_max_pending(mut self, max_pending: usize) -> Self {
        self.max_pending = max_pending.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_override_defaults() {
        let config = PersistenceConfig::from_values(Some("40"), Some("4"));
        assert_eq!(config.flush_interval, Duration::from_millis(40));
        assert_eq!(config.max_pending, 4);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = PersistenceConfig::from_values(Some("soon"), Some("0"));
        assert_eq!(config, PersistenceConfig::default());

        let config = PersistenceConfig::from_values(Some("0"), None);
        assert_eq!(config, PersistenceConfig::default());
    }

    #[test]
    fn test_zero_interval_is_raised_to_minimum() {
        let config = PersistenceConfig::default()
            .with_flush_interval(Duration::ZERO)
            .with_max_pending(0);
        assert_eq!(config.flush_interval, MIN_FLUSH_INTERVAL);
        assert_eq!(config.max_pending, 1);
    }
}
