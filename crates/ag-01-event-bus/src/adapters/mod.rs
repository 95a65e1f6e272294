//! Adapters layer.

pub mod websocket;

pub use websocket::{BridgeStats, OutboundFrame, WebSocketBridge};
