//! Service layer.

pub mod limiter;

pub use limiter::MaturityRateLimiter;
