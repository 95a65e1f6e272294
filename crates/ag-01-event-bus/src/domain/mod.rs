//! Domain layer: routing rules and the subscription registry.

pub mod registry;
pub mod routing;

pub use registry::{SubscriptionEntry, SubscriptionHandle, SubscriptionId, SubscriptionRegistry};
pub use routing::post_topics;
