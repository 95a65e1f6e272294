//! Domain layer: cursor codec, page shape and configuration.

pub mod config;
pub mod cursor;
pub mod page;

pub use config::PaginationConfig;
pub use cursor::{decode_cursor, encode_cursor, FilterFingerprint, CURSOR_VERSION};
pub use page::FeedPage;
