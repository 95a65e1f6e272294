use std::env;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedServiceConfig {
    /// Longest accepted post body, in characters.
    pub max_content_len: usize,
    /// Budget for one reputation notification before it is abandoned.
    pub notify_timeout: Duration,
}

impl Default for FeedServiceConfig {
    fn default() -> Self {
        Self {
            max_content_len: 4_000,
            notify_timeout: Duration::from_secs(2),
        }
    }
}

impl FeedServiceConfig {
    /// # Environment Variables
    ///
    /// - `AGORA_FEED_MAX_CONTENT_LEN` (default: 4000)
    /// - `AGORA_NOTIFY_TIMEOUT_MS` (default: 2000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_content_len: env::var("AGORA_FEED_MAX_CONTENT_LEN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_content_len),
            notify_timeout: env::var("AGORA_NOTIFY_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.notify_timeout),
        }
    }
}
