//! # Pagination Engine
//!
//! Keyset pagination: each page is "the next `n` rows strictly after the
//! last key served", so rows inserted mid-traversal (which always sort
//! before the first page in chronological order) never shift later pages.

use ag_02_feed_store::{FeedFilters, FeedOrder, FeedStore, SortKey};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::{decode_cursor, encode_cursor, FeedPage, FilterFingerprint, PaginationConfig};
use crate::error::{InvalidCursor, PaginationError};

pub struct PaginationEngine {
    store: Arc<dyn FeedStore>,
    config: PaginationConfig,
}

impl PaginationEngine {
    pub fn new(store: Arc<dyn FeedStore>) -> Self {
        Self::with_config(store, PaginationConfig::default())
    }

    pub fn with_config(store: Arc<dyn FeedStore>, config: PaginationConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Fetch one page.
    ///
    /// # Arguments
    /// * `cursor` - `None` for the first page, else a `next_cursor` minted
    ///   for the same `filters` and `order`
    /// * `page_size` - clamped to `[1, max_page_size]`; `None` uses the default
    ///
    /// # Errors
    /// - `InvalidCursor::Malformed` / `InvalidCursor::FingerprintMismatch`
    /// - `Store` when the store fails
    pub async fn get_page(
        &self,
        cursor: Option<&str>,
        filters: &FeedFilters,
        order: FeedOrder,
        page_size: Option<usize>,
    ) -> Result<FeedPage, PaginationError> {
        let fingerprint = FilterFingerprint::compute(filters, order);
        let after = match cursor {
            Some(cursor) => Some(resume_key(cursor, &fingerprint, order)?),
            None => None,
        };
        let page_size = self.config.clamp(page_size);

        let mut items = self
            .store
            .query_posts(after, page_size.saturating_add(1), filters, order)
            .await?;

        let next_cursor = if items.len() > page_size {
            items.truncate(page_size);
            items
                .last()
                .map(|last| encode_cursor(&SortKey::for_post(last, order), &fingerprint))
        } else {
            None
        };

        debug!(
            fingerprint = %fingerprint,
            order = ?order,
            page_size,
            returned = items.len(),
            has_more = next_cursor.is_some(),
            "Feed page served"
        );

        Ok(FeedPage {
            items,
            next_cursor,
            restarted: false,
        })
    }

    /// Like [`Self::get_page`], but an unusable cursor yields the first page
    /// with `restarted = true` instead of an error.
    pub async fn get_page_or_restart(
        &self,
        cursor: Option<&str>,
        filters: &FeedFilters,
        order: FeedOrder,
        page_size: Option<usize>,
    ) -> Result<FeedPage, PaginationError> {
        match self.get_page(cursor, filters, order, page_size).await {
            Err(PaginationError::InvalidCursor(reason)) => {
                warn!(error = %reason, "Unusable cursor, restarting from the first page");
                let mut page = self.get_page(None, filters, order, page_size).await?;
                page.restarted = true;
                Ok(page)
            }
            other => other,
        }
    }
}

fn resume_key(
    cursor: &str,
    expected: &FilterFingerprint,
    order: FeedOrder,
) -> Result<SortKey, InvalidCursor> {
    let (key, fingerprint) = decode_cursor(cursor)?;
    if &fingerprint != expected {
        return Err(InvalidCursor::FingerprintMismatch);
    }
    if order == FeedOrder::Engagement && key.score.is_none() {
        return Err(InvalidCursor::Malformed("engagement cursor without score".into()));
    }
    Ok(key)
}
