//! Login throttling against password guessing

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::info;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Failures tolerated inside one window
    pub max_attempts: u32,
    /// Time window in seconds
    pub window_seconds: u64,
    /// Ban duration in seconds
    pub ban_duration_seconds: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_seconds: 300,
            ban_duration_seconds: 900,
        }
    }
}

#[derive(Debug)]
struct FailureEntry {
    failures: u32,
    window_start: Instant,
    ban_expires: Option<Instant>,
}

/// Tracks failed logins per key and bans keys that fail too often
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    entries: Arc<Mutex<HashMap<String, FailureEntry>>>,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Whether `key` may attempt a login now
    pub async fn is_allowed(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        match entries.get(key).and_then(|entry| entry.ban_expires) {
            Some(expires) if now < expires => false,
            Some(_) => {
                entries.remove(key);
                true
            }
            None => true,
        }
    }

    /// Count a failed attempt, banning `key` once it exceeds the limit
    pub async fn record_failure(&self, key: &str) {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();
        let window = Duration::from_secs(self.config.window_seconds);

        let entry = entries.entry(key.to_string()).or_insert(FailureEntry {
            failures: 0,
            window_start: now,
            ban_expires: None,
        });

        if now.duration_since(entry.window_start) >= window {
            entry.failures = 0;
            entry.window_start = now;
        }

        entry.failures += 1;

        if entry.failures > self.config.max_attempts {
            entry.ban_expires = Some(now + Duration::from_secs(self.config.ban_duration_seconds));
            info!(
                "Banned login for {} for {} seconds",
                key, self.config.ban_duration_seconds
            );
        }
    }

    /// Forget past failures for `key`
    pub async fn reset(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }

    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }
}
