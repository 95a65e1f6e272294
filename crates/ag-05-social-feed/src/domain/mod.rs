//! Domain layer: request validation, feed queries and configuration.

pub mod config;
pub mod query;
pub mod validation;

pub use config::FeedServiceConfig;
pub use query::FeedQuery;
pub use validation::{validate_draft, validate_reaction};
