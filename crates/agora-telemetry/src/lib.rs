//! # Agora Telemetry
//!
//! Structured logging and Prometheus metrics.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agora_telemetry::{init_telemetry, TelemetryConfig};
//!
//! let _guard = init_telemetry(TelemetryConfig::from_env())?;
//! let broker = HybridBroker::from_config(config, Arc::new(PrometheusBusMetrics)).await;
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AGORA_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//! | `AGORA_JSON_LOGS` | `false` | JSON log lines |
//! | `AGORA_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `AGORA_SERVICE_NAME` | `agora` | Service name |
//! | `AGORA_ENV` | `dev` | Environment name |

#![cfg_attr(test, allow(clippy::unwrap_used))]

mod config;
mod logging;
pub mod metrics;
mod recorders;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{encode_metrics, register_metrics, MetricsHandle};
pub use recorders::{PrometheusBusMetrics, PrometheusFeedMetrics, PrometheusRateLimitMetrics};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    Metrics(String),
}

/// Register metrics, then install the global log subscriber.
///
/// Hold the returned guard for the lifetime of the process.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    logging::init_logging(&config)?;
    Ok(TelemetryGuard { metrics })
}

pub struct TelemetryGuard {
    metrics: MetricsHandle,
}

impl TelemetryGuard {
    pub fn metrics(&self) -> &MetricsHandle {
        &self.metrics
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry");
    }
}
