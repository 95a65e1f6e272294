//! Metrics hooks for broker operations.
//!
//! The broker reports through [`BusMetrics`]; the node runtime plugs in a
//! Prometheus-backed recorder, everything else uses [`NoOpBusMetrics`].

use crate::mode::BrokerMode;

/// Instrumentation points for the broker.
pub trait BusMetrics: Send + Sync {
    fn message_published(&self, _topic: &str, _local_receivers: usize) {}

    fn mode_changed(&self, _mode: BrokerMode) {}

    fn reconnect_attempt(&self) {}

    fn remote_publish_failed(&self) {}

    fn remote_frame_received(&self) {}
}

/// Recorder that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpBusMetrics;

impl BusMetrics for NoOpBusMetrics {}
