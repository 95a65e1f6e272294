//! Domain layer: tier policy and decision types.

pub mod decision;
pub mod policy;

pub use decision::{Denial, RateLimitDecision, RateLimitInfo};
pub use policy::{FailurePolicy, RateLimitConfig, TierLimit};
