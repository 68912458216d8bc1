//! Notification store configuration.

use serde::{Deserialize, Serialize};

/// Notification persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Days until a notification expires when the producer does not set
    /// an explicit expiry.
    #[serde(default = "default_expiry_days")]
    pub default_expiry_days: i64,
    /// Interval of the periodic global expiry sweep, in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            default_expiry_days: default_expiry_days(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

fn default_expiry_days() -> i64 {
    30
}

fn default_sweep_interval() -> u64 {
    3600
}
