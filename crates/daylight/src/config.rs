//! Store configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Key the preference is persisted under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "theme";

/// How often [`OsColorScheme`](crate::OsColorScheme) re-detects the OS scheme.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Lower bound on the OS poll interval; smaller values are raised to it.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Settings for a [`ThemeStore`](crate::ThemeStore).
///
/// Every field has a default, so a partial config file is valid:
///
/// ```rust
/// use daylight::StoreConfig;
///
/// let config: StoreConfig = serde_json::from_str(r#"{"storage_key": "ui-theme"}"#).unwrap();
/// assert_eq!(config.storage_key, "ui-theme");
/// assert_eq!(config.poll_interval_ms, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL.as_millis() as u64
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl StoreConfig {
    /// The poll interval, never below [`MIN_POLL_INTERVAL`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms).max(MIN_POLL_INTERVAL)
    }
}
