//! # Channel Isolation
//!
//! A subscriber scoped to one channel never sees another channel's traffic,
//! whether it scopes by topic or by channel filter.

#[cfg(test)]
mod tests {
    use ag_02_feed_store::FeedFilters;
    use ag_05_social_feed::FeedQuery;
    use shared_types::NewPost;

    use crate::integration::support::{assert_quiet, collect, next, TestNode};

    #[tokio::test]
    async fn test_channel_topics_are_isolated() {
        for channels in 2..=10usize {
            let node = TestNode::local();
            let mut receivers: Vec<_> = (0..channels)
                .map(|c| collect(&node.bus, &format!("channel:ch-{c}"), None))
                .collect();

            for c in 0..channels {
                node.feed
                    .create_post(
                        NewPost::agent_status("agent-1", format!("for ch-{c}"))
                            .in_channel(format!("ch-{c}"))
                            .private(),
                    )
                    .await
                    .unwrap();
            }

            for (c, rx) in receivers.iter_mut().enumerate() {
                let message = next(rx).await;
                assert_eq!(message.channel.as_deref(), Some(format!("ch-{c}").as_str()));
                assert_quiet(rx).await;
            }
        }
    }

    #[tokio::test]
    async fn test_channel_filter_on_global_topic() {
        let node = TestNode::local();
        let mut ops_only = collect(&node.bus, "global", Some("ops"));

        node.feed
            .create_post(NewPost::agent_status("a", "dev chatter").in_channel("dev"))
            .await
            .unwrap();
        node.feed
            .create_post(NewPost::agent_status("a", "no channel"))
            .await
            .unwrap();
        let ops = node
            .feed
            .create_post(NewPost::agent_status("a", "ops update").in_channel("ops"))
            .await
            .unwrap();

        let message = next(&mut ops_only).await;
        assert_eq!(message.payload.as_post().map(|p| p.id), Some(ops.id));
        assert_quiet(&mut ops_only).await;
    }

    #[tokio::test]
    async fn test_channel_feed_query() {
        let node = TestNode::local();
        for c in ["a", "b", "a", "c", "a"] {
            node.feed
                .create_post(NewPost::agent_status("agent", "x").in_channel(c))
                .await
                .unwrap();
            node.clock.advance(1);
        }

        let page = node
            .feed
            .get_feed(&FeedQuery::new(FeedFilters::new().channel("a")))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 3);
        assert!(page.items.iter().all(|p| p.channel_id.as_deref() == Some("a")));
    }
}
