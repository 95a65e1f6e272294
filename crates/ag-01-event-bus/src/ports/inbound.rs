//! Inbound Ports (Driving Ports)
//!
//! Subscribers hand the bus a [`MessageHandler`]; the bus drives it from the
//! subscription's own task.

use async_trait::async_trait;
use shared_bus::BusMessage;
use std::future::Future;
use std::sync::Arc;

use crate::error::HandlerError;

/// Consumer of bus messages for one subscription.
///
/// Called sequentially per subscription, so a handler sees messages in the
/// order the broker delivered them.
#[async_trait]
pub trait MessageHandler: Send + Sync + 'static {
    async fn handle(&self, message: Arc<BusMessage>) -> Result<(), HandlerError>;
}

struct FnHandler<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> MessageHandler for FnHandler<F>
where
    F: Fn(Arc<BusMessage>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn handle(&self, message: Arc<BusMessage>) -> Result<(), HandlerError> {
        (self.f)(message).await
    }
}

/// Wrap an async closure as a handler.
///
/// ```ignore
/// let handler = handler_fn(|msg| async move {
///     println!("{}", msg.topic);
///     Ok(())
/// });
/// ```
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn MessageHandler>
where
    F: Fn(Arc<BusMessage>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    Arc::new(FnHandler { f })
}
