//! End-to-end ordering runs against the in-memory store.

use chrono::{TimeZone, Utc};
use keyorder_bench::bench::{ManualClock, OrderingOutcome, run_ordering_bench};
use keyorder_bench::config::{AppConfig, OrderingParams};
use keyorder_bench::store::{MemoryStore, ProductOrder, RecordStore};
use keyorder_bench::{BenchError, IdGenerator, IdStrategy};

fn clock() -> ManualClock {
    ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap())
}

/// 100 records, 2ms apart
fn params() -> OrderingParams {
    OrderingParams {
        records: 100,
        delay_ms: 2,
        code: "D42".to_string(),
        price: 100,
    }
}

#[tokio::test]
async fn qa_time_ordered_ids_preserve_insert_order() {
    for seed in [1, 7, 42, 1_000_003] {
        let store = MemoryStore::new();
        let mut ids = IdGenerator::seeded(IdStrategy::TimeOrdered, seed);

        let report = run_ordering_bench(&store, &clock(), &mut ids, &params(), 1)
            .await
            .unwrap_or_else(|e| panic!("seed {} failed: {}", seed, e));

        assert_eq!(report.outcome, OrderingOutcome::Consistent);
        assert_eq!(report.records, 100);
    }
}

#[tokio::test]
async fn qa_random_ids_break_insert_order() {
    let store = MemoryStore::new();
    let mut ids = IdGenerator::seeded(IdStrategy::Random, 42);

    let report = run_ordering_bench(&store, &clock(), &mut ids, &params(), 1)
        .await
        .expect("random strategy reports divergence instead of failing");

    match report.outcome {
        OrderingOutcome::Diverged {
            first_index,
            mismatches,
            ..
        } => {
            assert!(mismatches >= 1);
            assert!(first_index < 100);
        }
        OrderingOutcome::Consistent => panic!("100 random ids came back in insertion order"),
    }
}

#[tokio::test]
async fn qa_listing_is_sorted_by_id_bytes() {
    let store = MemoryStore::new();
    let mut ids = IdGenerator::seeded(IdStrategy::TimeOrdered, 3);
    run_ordering_bench(&store, &clock(), &mut ids, &params(), 1)
        .await
        .unwrap();

    let by_id = store.list_products(ProductOrder::Id).await.unwrap();
    let ulids: Vec<String> = by_id.iter().map(|p| p.meta.id().to_ulid().to_string()).collect();

    // Crockford base32 keeps the same order as the raw bytes
    let mut sorted = ulids.clone();
    sorted.sort();
    assert_eq!(ulids, sorted);

    // Millisecond prefix matches the row timestamp
    for product in &by_id {
        assert_eq!(
            product.meta.id().timestamp_ms() as i64,
            product.meta.created_at().timestamp_millis()
        );
    }
}

#[tokio::test]
async fn qa_soft_deleted_rows_leave_both_listings() {
    let store = MemoryStore::new();
    let mut ids = IdGenerator::seeded(IdStrategy::TimeOrdered, 9);
    run_ordering_bench(&store, &clock(), &mut ids, &params(), 1)
        .await
        .unwrap();

    let victim = store.list_products(ProductOrder::Id).await.unwrap()[10]
        .meta
        .id();
    assert!(store.soft_delete_product(victim, Utc::now()).await.unwrap());

    let by_created = store.list_products(ProductOrder::CreatedAt).await.unwrap();
    let by_id = store.list_products(ProductOrder::Id).await.unwrap();
    assert_eq!(by_created.len(), 99);
    assert_eq!(by_created, by_id);
    assert!(by_id.iter().all(|p| p.meta.id() != victim));
}

#[tokio::test]
async fn qa_mismatch_names_the_index() {
    let store = MemoryStore::new();
    let mut ids = IdGenerator::seeded(IdStrategy::TimeOrdered, 42);
    let params = OrderingParams {
        delay_ms: 0,
        ..params()
    };

    // Every insert lands in the same millisecond, so the random tail decides id order
    match run_ordering_bench(&store, &clock(), &mut ids, &params, 1).await {
        Err(BenchError::OrderingMismatch {
            index,
            by_created,
            by_id,
        }) => {
            assert!(index < 100);
            assert_ne!(by_created, by_id);
            let msg = BenchError::OrderingMismatch {
                index,
                by_created,
                by_id,
            }
            .to_string();
            assert!(msg.contains(&format!("index {}", index)));
        }
        other => panic!("expected an ordering mismatch, got {:?}", other.map(|r| r.outcome)),
    }
}

#[test]
fn qa_shipped_configs_parse() {
    for env in ["dev", "ci"] {
        let config = AppConfig::load(env).unwrap_or_else(|e| panic!("config/{}.yaml: {}", env, e));
        assert_eq!(config.bench.ordering.records, 100);
        assert_eq!(config.bench.ordering.delay_ms, 2);
    }
}
