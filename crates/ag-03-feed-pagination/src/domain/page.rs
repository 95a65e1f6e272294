use serde::Serialize;
use shared_types::Post;

/// One page of a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedPage {
    pub items: Vec<Post>,
    /// `None` on the last page.
    pub next_cursor: Option<String>,
    /// Set when an unusable cursor was replaced by the first page.
    pub restarted: bool,
}

impl FeedPage {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
            restarted: false,
        }
    }

    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}
