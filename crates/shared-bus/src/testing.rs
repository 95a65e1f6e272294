//! In-memory stand-in for a distributed broker.
//!
//! Several [`crate::HybridBroker`] instances can share one [`InMemoryCluster`]
//! to exercise cross-instance fan-out, outages and recovery without Redis.

use crate::remote::{BrokerUnavailable, RemoteConnector, RemoteLink};
use async_trait::async_trait;
use futures::future;
use futures::stream::{BoxStream, StreamExt};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::BroadcastStream;

const CLUSTER_CAPACITY: usize = 1024;

struct ClusterState {
    frames: broadcast::Sender<(String, Vec<u8>)>,
    online: watch::Sender<bool>,
    fail_publishes: AtomicBool,
    connects: AtomicU64,
}

impl ClusterState {
    fn is_online(&self) -> bool {
        *self.online.borrow()
    }
}

/// A shared fake cluster. Starts online.
#[derive(Clone)]
pub struct InMemoryCluster {
    state: Arc<ClusterState>,
}

impl InMemoryCluster {
    pub fn new() -> Self {
        let (frames, _) = broadcast::channel(CLUSTER_CAPACITY);
        let (online, _) = watch::channel(true);
        Self {
            state: Arc::new(ClusterState {
                frames,
                online,
                fail_publishes: AtomicBool::new(false),
                connects: AtomicU64::new(0),
            }),
        }
    }

    /// Taking the cluster offline ends every open inbound stream and makes
    /// new connection attempts fail.
    pub fn set_online(&self, online: bool) {
        self.state.online.send_replace(online);
    }

    /// Make publishes fail while leaving connections up.
    pub fn fail_publishes(&self, fail: bool) {
        self.state.fail_publishes.store(fail, Ordering::SeqCst);
    }

    /// Successful connections so far.
    pub fn connection_count(&self) -> u64 {
        self.state.connects.load(Ordering::SeqCst)
    }

    pub fn connector(&self) -> Arc<dyn RemoteConnector> {
        Arc::new(ClusterConnector {
            state: Arc::clone(&self.state),
        })
    }
}

impl Default for InMemoryCluster {
    fn default() -> Self {
        Self::new()
    }
}

struct ClusterConnector {
    state: Arc<ClusterState>,
}

#[async_trait]
impl RemoteConnector for ClusterConnector {
    async fn connect(&self) -> Result<Arc<dyn RemoteLink>, BrokerUnavailable> {
        if !self.state.is_online() {
            return Err(BrokerUnavailable::Connect("cluster offline".into()));
        }
        self.state.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(ClusterLink {
            state: Arc::clone(&self.state),
        }))
    }

    fn describe(&self) -> String {
        "memory://cluster".to_string()
    }
}

struct ClusterLink {
    state: Arc<ClusterState>,
}

#[async_trait]
impl RemoteLink for ClusterLink {
    async fn publish(&self, topic: &str, frame: Vec<u8>) -> Result<(), BrokerUnavailable> {
        if !self.state.is_online() {
            return Err(BrokerUnavailable::Publish("cluster offline".into()));
        }
        if self.state.fail_publishes.load(Ordering::SeqCst) {
            return Err(BrokerUnavailable::Publish("injected failure".into()));
        }
        // No receivers is not an error for pub/sub.
        let _ = self.state.frames.send((topic.to_string(), frame));
        Ok(())
    }

    async fn inbound(&self) -> Result<BoxStream<'static, Vec<u8>>, BrokerUnavailable> {
        if !self.state.is_online() {
            return Err(BrokerUnavailable::Subscribe("cluster offline".into()));
        }
        let mut online = self.state.online.subscribe();
        let frames = BroadcastStream::new(self.state.frames.subscribe())
            .filter_map(|frame| future::ready(frame.ok().map(|(_, bytes)| bytes)));

        Ok(frames
            .take_until(async move {
                let _ = online.wait_for(|up| !*up).await;
            })
            .boxed())
    }
}
