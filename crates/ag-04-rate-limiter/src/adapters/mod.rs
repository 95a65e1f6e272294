//! Adapters layer.

pub mod store_counter;
pub mod tier_registry;

pub use store_counter::FeedStoreCounter;
pub use tier_registry::InMemoryTierRegistry;
