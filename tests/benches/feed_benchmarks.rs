//! # Agora Feed Benchmarks
//!
//! | Area | Operation | Target |
//! |------|-----------|--------|
//! | Pagination | cursor encode + decode | < 10µs |
//! | Pagination | page of 20 from 10k posts | < 1ms |
//! | Bus | local publish, 8 subscribers | < 20µs |
//! | Rate limiter | SUPERVISED check | < 100µs |

use std::sync::Arc;

use ag_02_feed_store::{FeedFilters, FeedOrder, FeedStore, InMemoryFeedStore, SortKey};
use ag_03_feed_pagination::{decode_cursor, encode_cursor, FilterFingerprint, PaginationEngine};
use ag_04_rate_limiter::{FeedStoreCounter, InMemoryTierRegistry, MaturityRateLimiter, RateLimitConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use shared_bus::{BusMessage, BusPayload, LocalBroker, MessageBroker, TopicPattern};
use shared_types::{MaturityTier, NewPost};
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
}

fn seeded_store(rt: &Runtime, posts: usize) -> Arc<InMemoryFeedStore> {
    let store = Arc::new(InMemoryFeedStore::new());
    rt.block_on(async {
        for n in 0..posts {
            store
                .insert_post(
                    NewPost::agent_status(format!("agent-{}", n % 50), "benchmark post")
                        .in_channel(format!("ch-{}", n % 10)),
                )
                .await
                .expect("insert");
        }
    });
    store
}

fn bench_cursor_codec(c: &mut Criterion) {
    let fingerprint = FilterFingerprint::compute(&FeedFilters::new().channel("ops"), FeedOrder::Chronological);
    let key = SortKey {
        created_at: 1_700_000_000_000,
        id: 123_456,
        score: None,
    };

    c.bench_function("cursor_encode_decode", |b| {
        b.iter(|| {
            let cursor = encode_cursor(black_box(&key), &fingerprint);
            black_box(decode_cursor(&cursor).expect("decode"))
        })
    });
}

fn bench_pagination(c: &mut Criterion) {
    let rt = runtime();
    let store = seeded_store(&rt, 10_000);
    let engine = PaginationEngine::new(store);

    let mut group = c.benchmark_group("pagination");
    for (name, filters) in [
        ("all", FeedFilters::new()),
        ("channel", FeedFilters::new().channel("ch-3")),
    ] {
        group.bench_with_input(BenchmarkId::new("first_page", name), &filters, |b, filters| {
            b.iter(|| {
                rt.block_on(engine.get_page(None, filters, FeedOrder::Chronological, Some(20)))
                    .expect("page")
            })
        });
    }
    group.bench_function("engagement_first_page", |b| {
        b.iter(|| {
            rt.block_on(engine.get_page(None, &FeedFilters::new(), FeedOrder::Engagement, Some(20)))
                .expect("page")
        })
    });
    group.finish();
}

fn bench_local_publish(c: &mut Criterion) {
    let rt = runtime();
    let broker = LocalBroker::new();
    let mut streams: Vec<_> = (0..8).map(|_| broker.subscribe(TopicPattern::parse("global"))).collect();
    let message = BusMessage::new(
        "global",
        None,
        "agent-1",
        BusPayload::SystemEvent {
            kind: "bench".into(),
            detail: serde_json::json!({ "n": 1 }),
        },
        0,
    );

    c.bench_function("local_publish_8_subscribers", |b| {
        b.iter(|| {
            rt.block_on(broker.publish(message.clone())).expect("publish");
            for stream in &mut streams {
                while let Ok(Some(_)) = stream.try_recv() {}
            }
        })
    });
}

fn bench_rate_limit_check(c: &mut Criterion) {
    let rt = runtime();
    let store = seeded_store(&rt, 5_000);
    let tiers = Arc::new(InMemoryTierRegistry::with_default(MaturityTier::Supervised));
    let limiter = MaturityRateLimiter::new(
        tiers,
        Arc::new(FeedStoreCounter::new(store)),
        RateLimitConfig::default(),
    );

    c.bench_function("rate_limit_check_supervised", |b| {
        b.iter(|| black_box(rt.block_on(limiter.check("agent-7"))))
    });
}

criterion_group!(
    benches,
    bench_cursor_codec,
    bench_pagination,
    bench_local_publish,
    bench_rate_limit_check
);
criterion_main!(benches);
