//! # Redis Adapter
//!
//! Implements the distributed broker ports on Redis pub/sub:
//! `PUBLISH <prefix><topic>` for outbound frames and
//! `PSUBSCRIBE <prefix>*` for inbound ones.

use crate::remote::{BrokerUnavailable, RemoteConnector, RemoteLink};
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use std::sync::Arc;
use tracing::{debug, info};

/// Opens Redis links.
pub struct RedisConnector {
    client: Client,
    channel_prefix: String,
    target: String,
}

impl RedisConnector {
    /// Parse the URL; no network I/O happens until [`RemoteConnector::connect`].
    pub fn new(url: &str, channel_prefix: impl Into<String>) -> Result<Self, BrokerUnavailable> {
        let client = Client::open(url).map_err(|e| BrokerUnavailable::Connect(e.to_string()))?;
        let info = client.get_connection_info();
        let target = format!("redis://{}", info.addr);
        Ok(Self {
            client,
            channel_prefix: channel_prefix.into(),
            target,
        })
    }
}

#[async_trait]
impl RemoteConnector for RedisConnector {
    async fn connect(&self) -> Result<Arc<dyn RemoteLink>, BrokerUnavailable> {
        debug!(target_addr = %self.target, "Connecting to Redis");

        let manager = ConnectionManager::new(self.client.clone())
            .await
            .map_err(|e| BrokerUnavailable::Connect(e.to_string()))?;

        info!(target_addr = %self.target, "Connected to Redis");
        Ok(Arc::new(RedisLink {
            client: self.client.clone(),
            manager,
            channel_prefix: self.channel_prefix.clone(),
        }))
    }

    fn describe(&self) -> String {
        self.target.clone()
    }
}

/// A live Redis link.
pub struct RedisLink {
    client: Client,
    manager: ConnectionManager,
    channel_prefix: String,
}

#[async_trait]
impl RemoteLink for RedisLink {
    async fn publish(&self, topic: &str, frame: Vec<u8>) -> Result<(), BrokerUnavailable> {
        let mut conn = self.manager.clone();
        let channel = format!("{}{}", self.channel_prefix, topic);
        let _receivers: i64 = conn
            .publish(channel, frame)
            .await
            .map_err(|e| BrokerUnavailable::Publish(e.to_string()))?;
        Ok(())
    }

    async fn inbound(&self) -> Result<BoxStream<'static, Vec<u8>>, BrokerUnavailable> {
        let mut pubsub = self
            .client
            .get_async_pubsub()
            .await
            .map_err(|e| BrokerUnavailable::Subscribe(e.to_string()))?;

        pubsub
            .psubscribe(format!("{}*", self.channel_prefix))
            .await
            .map_err(|e| BrokerUnavailable::Subscribe(e.to_string()))?;

        Ok(pubsub
            .into_on_message()
            .map(|msg| msg.get_payload_bytes().to_vec())
            .boxed())
    }
}
