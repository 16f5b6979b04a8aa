//! Configuration types for the resolution and sync pipeline

use std::time::Duration;

/// Configuration shared by the registry client and the local reconciler
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Bound on every registry/download request; network I/O never blocks
    /// past this
    pub timeout: Duration,
    pub user_agent: String,
    pub max_retries: usize,
    /// Initial delay between download retries (doubles each retry)
    pub retry_delay: Duration,
    /// Maximum retry delay cap (prevents exponential backoff from getting too long)
    pub max_retry_delay: Duration,
    /// Verify existing local files against the manifest SHA-1 before
    /// skipping them. Off by default: a file that exists at the manifest
    /// path is treated as up to date.
    pub verify_existing_hashes: bool,
}

impl SyncConfig {
    /// Calculate retry delay for the given attempt using exponential backoff
    pub fn retry_delay_for(&self, attempt: usize) -> Duration {
        let delay = self.retry_delay.as_millis() as u64 * 2_u64.pow(attempt.min(16) as u32);
        Duration::from_millis(delay.min(self.max_retry_delay.as_millis() as u64))
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("packsync/", env!("CARGO_PKG_VERSION")).to_string(),
            max_retries: 3,
            retry_delay: Duration::from_millis(1000),
            max_retry_delay: Duration::from_secs(60),
            verify_existing_hashes: false,
        }
    }
}
