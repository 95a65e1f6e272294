//! Service layer.

pub mod event_bus;

pub use event_bus::{EventBus, WeakEventBus, SYSTEM_SENDER};
