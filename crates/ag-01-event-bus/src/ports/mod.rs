//! Ports layer.

pub mod inbound;

pub use inbound::{handler_fn, MessageHandler};
