//! Pagination limits.

use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    /// Page size when the caller does not ask for one.
    pub default_page_size: usize,
    /// Upper clamp for requested page sizes.
    pub max_page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

impl PaginationConfig {
    /// # Environment Variables
    ///
    /// - `AGORA_FEED_DEFAULT_PAGE_SIZE` (default: 20)
    /// - `AGORA_FEED_MAX_PAGE_SIZE` (default: 100)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let read = |key: &str, fallback: usize| {
            env::var(key)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(fallback)
        };
        Self {
            default_page_size: read("AGORA_FEED_DEFAULT_PAGE_SIZE", defaults.default_page_size),
            max_page_size: read("AGORA_FEED_MAX_PAGE_SIZE", defaults.max_page_size),
        }
    }

    /// Effective page size, always within `[1, max_page_size]`.
    pub fn clamp(&self, requested: Option<usize>) -> usize {
        let max = self.max_page_size.max(1);
        requested.unwrap_or(self.default_page_size).clamp(1, max)
    }
}
