//! # Pagination Under Concurrent Writes
//!
//! A reader walking the feed while a writer keeps posting must see every
//! pre-existing post exactly once, in order.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    use ag_02_feed_store::{FeedFilters, FeedOrder, FeedStore, InMemoryFeedStore};
    use ag_03_feed_pagination::{PaginationConfig, PaginationEngine};
    use ag_05_social_feed::{FeedError, FeedQuery};
    use shared_types::{NewPost, PostId};
    use tokio::sync::watch;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_traversal_with_concurrent_writer() {
        let store = Arc::new(InMemoryFeedStore::new());
        let mut seeded = HashSet::new();
        for n in 0..250 {
            let post = store
                .insert_post(NewPost::agent_status(format!("agent-{}", n % 7), "seed"))
                .await
                .unwrap();
            seeded.insert(post.id);
        }

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let writer_store = Arc::clone(&store);
        let writer = tokio::spawn(async move {
            let mut written = 0u64;
            loop {
                tokio::select! {
                    _ = stop_rx.changed() => break,
                    result = writer_store.insert_post(NewPost::agent_status("writer", "live")) => {
                        result.unwrap();
                        written += 1;
                        tokio::time::sleep(Duration::from_millis(1)).await;
                    }
                }
            }
            written
        });

        let engine = PaginationEngine::with_config(
            store.clone(),
            PaginationConfig {
                default_page_size: 17,
                max_page_size: 100,
            },
        );
        let filters = FeedFilters::new();
        let mut seen: Vec<PostId> = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = engine
                .get_page(cursor.as_deref(), &filters, FeedOrder::Chronological, None)
                .await
                .unwrap();
            seen.extend(page.items.iter().map(|p| p.id));
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        stop_tx.send(true).unwrap();
        writer.await.unwrap();

        let unique: HashSet<PostId> = seen.iter().copied().collect();
        assert_eq!(unique.len(), seen.len(), "duplicates served");
        assert!(seeded.is_subset(&unique), "pre-existing posts skipped");
        assert!(seen.windows(2).all(|w| w[0] > w[1]), "out of order");
    }

    #[tokio::test]
    async fn test_cursor_rejected_for_different_filters() {
        let node = crate::integration::support::TestNode::local();
        for _ in 0..5 {
            node.feed
                .create_post(NewPost::agent_status("a", "x").in_channel("ops"))
                .await
                .unwrap();
        }

        let first = node
            .feed
            .get_feed(&FeedQuery::default().page_size(2))
            .await
            .unwrap();
        let cursor = first.next_cursor.unwrap();

        let strict = node
            .feed
            .get_feed_strict(&FeedQuery::new(FeedFilters::new().channel("ops")).after(cursor.clone()))
            .await;
        assert!(matches!(strict, Err(FeedError::InvalidCursor(_))));

        let lenient = node
            .feed
            .get_feed(&FeedQuery::new(FeedFilters::new().channel("ops")).after(cursor).page_size(2))
            .await
            .unwrap();
        assert!(lenient.restarted);
        assert_eq!(lenient.items.len(), 2);
        assert_eq!(lenient.items[0].id, 5);
    }
}
