//! # WebSocket Bridge Isolation
//!
//! Each socket client gets only its own topics and its own directed
//! messages; a client that goes away does not disturb the rest.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ag_01_event_bus::WebSocketBridge;
    use serde_json::Value;
    use shared_types::NewPost;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    use crate::integration::support::TestNode;

    async fn frame(rx: &mut mpsc::Receiver<String>) -> Value {
        let text = timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timed out waiting for a frame")
            .expect("client queue closed");
        serde_json::from_str(&text).unwrap()
    }

    async fn no_frame(rx: &mut mpsc::Receiver<String>) {
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err(), "unexpected frame");
    }

    #[tokio::test]
    async fn test_clients_only_see_their_topics() {
        let node = TestNode::local();
        let (ops_tx, mut ops_rx) = mpsc::channel(16);
        let (global_tx, mut global_rx) = mpsc::channel(16);
        let _ops = WebSocketBridge::attach(&node.bus, "ops-bot", &["channel:ops".to_string()], ops_tx)
            .unwrap();
        let _global = WebSocketBridge::attach(&node.bus, "reader", &["global".to_string()], global_tx)
            .unwrap();

        node.feed
            .create_post(NewPost::agent_status("a", "ops only").in_channel("ops").private())
            .await
            .unwrap();
        node.feed
            .create_post(NewPost::agent_status("a", "for everyone"))
            .await
            .unwrap();

        assert_eq!(frame(&mut ops_rx).await["payload"]["post"]["content"], "ops only");
        assert_eq!(frame(&mut global_rx).await["payload"]["post"]["content"], "for everyone");
        no_frame(&mut ops_rx).await;
        no_frame(&mut global_rx).await;
    }

    #[tokio::test]
    async fn test_directed_messages_reach_only_the_recipient() {
        let node = TestNode::local();
        let (alice_tx, mut alice_rx) = mpsc::channel(16);
        let (bob_tx, mut bob_rx) = mpsc::channel(16);
        let _alice = WebSocketBridge::attach(&node.bus, "alice", &[], alice_tx).unwrap();
        let _bob = WebSocketBridge::attach(&node.bus, "bob", &[], bob_tx).unwrap();

        node.feed
            .send_direct("bob", "alice", serde_json::json!({ "text": "hi alice" }))
            .await
            .unwrap();

        let received = frame(&mut alice_rx).await;
        assert_eq!(received["topic"], "agent:alice");
        assert_eq!(received["sender_id"], "bob");
        assert_eq!(received["payload"]["body"]["text"], "hi alice");
        no_frame(&mut bob_rx).await;
    }

    #[tokio::test]
    async fn test_disconnected_client_is_cleaned_up() {
        let node = TestNode::local();
        let topics = vec!["global".to_string()];
        let (gone_tx, gone_rx) = mpsc::channel(16);
        let (live_tx, mut live_rx) = mpsc::channel(16);
        let gone = WebSocketBridge::attach(&node.bus, "gone", &topics, gone_tx).unwrap();
        let _live = WebSocketBridge::attach(&node.bus, "live", &topics, live_tx).unwrap();
        drop(gone_rx);

        for n in 0..3 {
            node.feed
                .create_post(NewPost::agent_status("a", format!("#{n}")))
                .await
                .unwrap();
        }
        for n in 0..3 {
            assert_eq!(frame(&mut live_rx).await["payload"]["post"]["content"], format!("#{n}"));
        }

        drop(gone);
        assert_eq!(node.bus.subscription_count(), 2);
    }
}
