//! Ports layer.

pub mod outbound;

pub use outbound::{PostCounter, TierProvider};
