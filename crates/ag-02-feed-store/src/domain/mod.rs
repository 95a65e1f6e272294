//! Domain layer: filters and feed ordering.

pub mod filters;
pub mod ordering;

pub use filters::FeedFilters;
pub use ordering::{FeedOrder, SortKey, MAX_REACTION_LEN};
