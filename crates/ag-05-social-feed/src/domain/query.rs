use ag_02_feed_store::{FeedFilters, FeedOrder};
use serde::Deserialize;

/// A feed read request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub filters: FeedFilters,
    #[serde(default)]
    pub order: FeedOrder,
    #[serde(default)]
    pub page_size: Option<usize>,
}

impl FeedQuery {
    pub fn new(filters: FeedFilters) -> Self {
        Self {
            filters,
            ..Self::default()
        }
    }

    pub fn ordered_by(mut self, order: FeedOrder) -> Self {
        self.order = order;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}
