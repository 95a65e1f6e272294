//! # Error Types
//!
//! Errors shared across crates.

use thiserror::Error;

/// Errors parsing domain enums from their wire names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown post type: {0}")]
    UnknownPostType(String),

    #[error("Unknown maturity tier: {0}")]
    UnknownTier(String),
}
