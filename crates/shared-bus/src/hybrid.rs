//! # Hybrid Broker
//!
//! The production broker: always delivers locally, forwards to a distributed
//! broker while one is reachable, and falls back to local-only delivery
//! without surfacing an error when it is not.
//!
//! ## Background task
//!
//! A single supervisor task per broker owns the inbound stream and the
//! reconnect loop:
//!
//! ```text
//!   LocalOnly ──connect ok──► Distributed ──stream ends / publish fails──┐
//!                                          (or publish_timeout elapses)  │
//!      ▲  │                                                              │
//!      │  └─connect fails: sleep(backoff), retry                         │
//!      └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `shutdown()` signals the task through a watch channel and joins it.

use crate::config::{Backoff, BrokerConfig};
use crate::events::{BusMessage, WireEnvelope};
use crate::metrics::{BusMetrics, NoOpBusMetrics};
use crate::mode::{BrokerMode, BrokerSignal};
use crate::publisher::{BrokerHealth, LocalBroker, MessageBroker, PublishError};
use crate::redis_link::RedisConnector;
use crate::remote::{BrokerUnavailable, RemoteConnector, RemoteLink};
use crate::subscriber::MessageStream;
use crate::topic::TopicPattern;
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

struct Inner {
    instance_id: Uuid,
    local: LocalBroker,
    config: BrokerConfig,
    link: RwLock<Option<Arc<dyn RemoteLink>>>,
    mode: RwLock<BrokerMode>,
    /// Woken when a publish failure drops the link.
    link_lost: Notify,
    reconnect_attempts: AtomicU64,
    metrics: Arc<dyn BusMetrics>,
}

impl Inner {
    fn mode(&self) -> BrokerMode {
        *self.mode.read()
    }

    fn signal(&self, signal: BrokerSignal) {
        let (from, to) = {
            let mut mode = self.mode.write();
            let from = *mode;
            *mode = from.apply(signal);
            (from, *mode)
        };
        if from != to {
            info!(from = %from, to = %to, signal = ?signal, "Broker mode changed");
            self.metrics.mode_changed(to);
        }
    }

    fn install_link(&self, link: Arc<dyn RemoteLink>) {
        *self.link.write() = Some(link);
        self.signal(BrokerSignal::Connected);
    }

    fn drop_link(&self, signal: BrokerSignal) {
        self.link.write().take();
        self.signal(signal);
    }

    fn current_link(&self) -> Option<Arc<dyn RemoteLink>> {
        self.link.read().clone()
    }

    fn handle_inbound(&self, frame: &[u8]) {
        self.metrics.remote_frame_received();
        match WireEnvelope::decode(frame) {
            Ok(envelope) if envelope.origin == self.instance_id => {}
            Ok(envelope) => {
                self.local.deliver(Arc::new(envelope.message));
            }
            Err(e) => warn!(error = %e, "Dropping undecodable inbound frame"),
        }
    }
}

/// Broker with distributed fan-out and transparent local fallback.
pub struct HybridBroker {
    inner: Arc<Inner>,
    shutdown_tx: watch::Sender<bool>,
    supervisor: Mutex<Option<JoinHandle<()>>>,
}

impl HybridBroker {
    /// A broker with no distributed side; never spawns a task.
    #[must_use]
    pub fn local_only(config: BrokerConfig) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        let instance_id = Uuid::new_v4();
        Self {
            inner: Arc::new(Inner {
                instance_id,
                local: LocalBroker::with_origin(config.max_payload_bytes, instance_id),
                config,
                link: RwLock::new(None),
                mode: RwLock::new(BrokerMode::LocalOnly),
                link_lost: Notify::new(),
                reconnect_attempts: AtomicU64::new(0),
                metrics: Arc::new(NoOpBusMetrics),
            }),
            shutdown_tx,
            supervisor: Mutex::new(None),
        }
    }

    /// Build a broker and make one bounded connection attempt.
    ///
    /// A failed attempt is not an error: the broker starts in local-only mode
    /// and the supervisor keeps retrying on the backoff schedule.
    /// Must be called inside a tokio runtime.
    pub async fn start(
        config: BrokerConfig,
        connector: Arc<dyn RemoteConnector>,
        metrics: Arc<dyn BusMetrics>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let instance_id = Uuid::new_v4();
        let inner = Arc::new(Inner {
            instance_id,
            local: LocalBroker::with_origin(config.max_payload_bytes, instance_id),
            config,
            link: RwLock::new(None),
            mode: RwLock::new(BrokerMode::LocalOnly),
            link_lost: Notify::new(),
            reconnect_attempts: AtomicU64::new(0),
            metrics,
        });

        let initial = match attempt_connect(&inner, connector.as_ref()).await {
            Ok(stream) => Some(stream),
            Err(e) => {
                warn!(
                    target_addr = %connector.describe(),
                    error = %e,
                    "Distributed broker unavailable, starting in local-only mode"
                );
                inner.signal(BrokerSignal::ConnectFailed);
                None
            }
        };

        let handle = tokio::spawn(supervise(
            Arc::clone(&inner),
            connector,
            initial,
            shutdown_rx,
        ));

        Self {
            inner,
            shutdown_tx,
            supervisor: Mutex::new(Some(handle)),
        }
    }

    /// Redis-backed broker when `redis_url` is set, local-only otherwise.
    ///
    /// An unparsable URL is logged and treated like an unreachable broker.
    pub async fn from_config(config: BrokerConfig, metrics: Arc<dyn BusMetrics>) -> Self {
        let Some(url) = config.redis_url.clone() else {
            info!("No distributed broker configured, running local-only");
            return Self::local_only(config);
        };

        match RedisConnector::new(&url, config.channel_prefix.clone()) {
            Ok(connector) => Self::start(config, Arc::new(connector), metrics).await,
            Err(e) => {
                warn!(error = %e, "Invalid Redis URL, running local-only");
                Self::local_only(config)
            }
        }
    }

    #[must_use]
    pub fn mode(&self) -> BrokerMode {
        self.inner.mode()
    }

    #[must_use]
    pub fn instance_id(&self) -> Uuid {
        self.inner.instance_id
    }

    /// Stop the reconnect loop and wait for the supervisor task to exit.
    ///
    /// Local delivery keeps working afterwards.
    pub async fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
        let handle = self.supervisor.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!(error = %e, "Broker supervisor ended abnormally");
            }
        }
        self.inner.drop_link(BrokerSignal::Shutdown);
        info!(instance_id = %self.inner.instance_id, "Broker shut down");
    }
}

impl Drop for HybridBroker {
    fn drop(&mut self) {
        // The supervisor exits on its own once it observes the signal.
        let _ = self.shutdown_tx.send(true);
    }
}

#[async_trait]
impl MessageBroker for HybridBroker {
    async fn publish(&self, message: BusMessage) -> Result<usize, PublishError> {
        let frame = self.inner.local.validate(&message)?;
        let topic = message.topic.clone();

        self.inner.local.record_published();
        let receivers = self.inner.local.deliver(Arc::new(message));
        self.inner.metrics.message_published(&topic, receivers);

        if let Some(link) = self.inner.current_link() {
            let forwarded =
                tokio::time::timeout(self.inner.config.publish_timeout, link.publish(&topic, frame))
                    .await
                    .unwrap_or(Err(BrokerUnavailable::PublishTimeout));
            if let Err(e) = forwarded {
                warn!(
                    topic = %topic,
                    error = %e,
                    "Distributed publish failed, falling back to local-only delivery"
                );
                self.inner.metrics.remote_publish_failed();
                self.inner.drop_link(BrokerSignal::PublishFailed);
                self.inner.link_lost.notify_one();
            }
        }

        Ok(receivers)
    }

    fn subscribe(&self, pattern: TopicPattern) -> MessageStream {
        self.inner.local.subscribe(pattern)
    }

    fn health(&self) -> BrokerHealth {
        let mode = self.inner.mode();
        BrokerHealth {
            connected: mode.is_distributed(),
            mode,
            reconnect_attempts: self.inner.reconnect_attempts.load(Ordering::Relaxed),
            messages_published: self.inner.local.messages_published(),
            local_subscribers: self.inner.local.subscriber_count(),
        }
    }
}

async fn attempt_connect(
    inner: &Inner,
    connector: &dyn RemoteConnector,
) -> Result<BoxStream<'static, Vec<u8>>, BrokerUnavailable> {
    let connect = async {
        let link = connector.connect().await?;
        let stream = link.inbound().await?;
        Ok::<_, BrokerUnavailable>((link, stream))
    };

    let (link, stream) = tokio::time::timeout(inner.config.connect_timeout, connect)
        .await
        .map_err(|_| BrokerUnavailable::Timeout)??;

    inner.install_link(link);
    Ok(stream)
}

async fn supervise(
    inner: Arc<Inner>,
    connector: Arc<dyn RemoteConnector>,
    mut inbound: Option<BoxStream<'static, Vec<u8>>>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut backoff = Backoff::new(inner.config.initial_backoff, inner.config.max_backoff);

    loop {
        if *shutdown.borrow() {
            break;
        }

        match inbound.as_mut() {
            Some(stream) => {
                tokio::select! {
                    frame = stream.next() => match frame {
                        Some(frame) => inner.handle_inbound(&frame),
                        None => {
                            warn!("Distributed broker stream closed, falling back to local-only delivery");
                            inner.drop_link(BrokerSignal::StreamClosed);
                            inbound = None;
                        }
                    },
                    _ = inner.link_lost.notified() => {
                        debug!("Link lost on publish, dropping inbound stream");
                        inbound = None;
                    }
                    _ = shutdown.changed() => break,
                }
            }
            None => {
                let attempt = inner.reconnect_attempts.fetch_add(1, Ordering::Relaxed) + 1;
                inner.metrics.reconnect_attempt();

                match attempt_connect(&inner, connector.as_ref()).await {
                    Ok(stream) => {
                        info!(attempt, target_addr = %connector.describe(), "Reconnected to distributed broker");
                        backoff.reset();
                        inbound = Some(stream);
                    }
                    Err(e) => {
                        inner.signal(BrokerSignal::ConnectFailed);
                        let delay = backoff.next_delay();
                        debug!(attempt, error = %e, delay_ms = delay.as_millis() as u64, "Reconnect failed");
                        tokio::select! {
                            _ = tokio::time::sleep(delay) => {}
                            _ = shutdown.changed() => break,
                        }
                    }
                }
            }
        }
    }

    debug!("Broker supervisor stopped");
}
