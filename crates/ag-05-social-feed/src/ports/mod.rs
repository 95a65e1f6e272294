//! Ports layer.

pub mod outbound;

pub use outbound::{GovernanceError, GovernanceGate, Interaction, InteractionKind, InteractionNotifier, NotifyError};
