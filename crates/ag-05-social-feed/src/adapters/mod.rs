//! Adapters layer.

pub mod governance;
pub mod notifier;

pub use governance::StaticGovernanceGate;
pub use notifier::{BusInteractionNotifier, NoOpNotifier};
