//! Node-level bus subscriptions.

pub mod observers;

pub use observers::SystemObserver;
