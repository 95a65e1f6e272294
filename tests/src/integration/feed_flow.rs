//! # Feed Flow
//!
//! `create_post` → store → event bus → subscribers, plus the reply and
//! reaction paths feeding the reputation notifier.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ag_03_feed_pagination::FeedPage;
    use ag_05_social_feed::{BusInteractionNotifier, FeedQuery};
    use shared_bus::{BusPayload, PostEventKind};
    use shared_types::{NewPost, PostType};

    use crate::integration::support::{assert_quiet, collect, next, TestNode};

    #[tokio::test]
    async fn test_post_reaches_global_subscribers() {
        let node = TestNode::local();
        let mut first = collect(&node.bus, "global", None);
        let mut second = collect(&node.bus, "global", None);

        let post = node
            .feed
            .create_post(NewPost::agent_status("agent-1", "deployed"))
            .await
            .unwrap();

        for rx in [&mut first, &mut second] {
            let message = next(rx).await;
            assert_eq!(message.topic, "global");
            assert_eq!(message.sender_id, "agent-1");
            assert_eq!(message.payload.as_post().map(|p| p.id), Some(post.id));
        }
    }

    #[tokio::test]
    async fn test_alert_fans_out_to_alerts_topic() {
        let node = TestNode::local();
        let mut alerts = collect(&node.bus, "alerts", None);
        let mut global = collect(&node.bus, "global", None);

        node.feed
            .create_post(NewPost::agent_status("monitor", "disk full").with_type(PostType::Alert))
            .await
            .unwrap();

        assert_eq!(next(&mut alerts).await.topic, "alerts");
        assert_eq!(next(&mut global).await.topic, "global");
    }

    #[tokio::test]
    async fn test_private_unchanneled_post_is_stored_but_not_broadcast() {
        let node = TestNode::local();
        let mut all = collect(&node.bus, "*", None);

        let post = node
            .feed
            .create_post(NewPost::agent_status("agent-1", "note to self").private())
            .await
            .unwrap();

        assert_quiet(&mut all).await;
        assert_eq!(node.feed.get_post(post.id).await.unwrap(), post);
    }

    #[tokio::test]
    async fn test_subscribers_see_publication_order() {
        let node = TestNode::local();
        let mut rx = collect(&node.bus, "global", None);

        let mut ids = Vec::new();
        for n in 0..20 {
            let post = node
                .feed
                .create_post(NewPost::agent_status("agent-1", format!("#{n}")))
                .await
                .unwrap();
            ids.push(post.id);
        }

        for id in ids {
            assert_eq!(next(&mut rx).await.payload.as_post().map(|p| p.id), Some(id));
        }
    }

    #[tokio::test]
    async fn test_thread_and_reactions() {
        let node = TestNode::local();
        let mut system = collect(&node.bus, "system", None);
        let feed = node
            .feed
            .with_notifier(Arc::new(BusInteractionNotifier::new(node.bus.clone())));
        let mut global = collect(&node.bus, "global", None);

        let question = feed
            .create_post(NewPost::agent_status("asker", "how?").with_type(PostType::Question))
            .await
            .unwrap();
        feed.reply(question.id, NewPost::agent_status("helper", "like this"))
            .await
            .unwrap();
        feed.react(question.id, "fan", "🔥").await.unwrap();

        let kinds: Vec<PostEventKind> = [
            next(&mut global).await,
            next(&mut global).await,
            next(&mut global).await,
        ]
        .iter()
        .filter_map(|m| match &m.payload {
            BusPayload::PostEvent { kind, .. } => Some(*kind),
            _ => None,
        })
        .collect();
        assert_eq!(
            kinds,
            vec![PostEventKind::Created, PostEventKind::Replied, PostEventKind::Reacted]
        );

        // Reply and reaction both credit the asker.
        for _ in 0..2 {
            let event = next(&mut system).await;
            match &event.payload {
                BusPayload::SystemEvent { kind, detail } => {
                    assert_eq!(kind, BusInteractionNotifier::EVENT_KIND);
                    assert_eq!(detail["author_id"], "asker");
                }
                other => panic!("unexpected payload {other:?}"),
            }
        }

        let thread: FeedPage = feed.get_replies(question.id, None, None).await.unwrap();
        assert_eq!(thread.items.len(), 1);
        let stored = feed.get_post(question.id).await.unwrap();
        assert_eq!(stored.reply_count, 1);
        assert_eq!(stored.total_reactions(), 1);

        let top_level = feed
            .get_feed(&FeedQuery::new(ag_02_feed_store::FeedFilters::new().top_level()))
            .await
            .unwrap();
        assert_eq!(top_level.items.len(), 1);
    }
}
