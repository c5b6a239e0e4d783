//! Store configuration.

use std::time::Duration;

/// Conversation store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Delay before a locally synthesized assistant follow-up appears.
    pub follow_up_delay: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            follow_up_delay: Duration::from_secs(2),
        }
    }
}
