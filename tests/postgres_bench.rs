//! Runs against a live PostgreSQL.
//!
//! docker run -d -e POSTGRES_USER=test -e POSTGRES_PASSWORD=test -e POSTGRES_DB=test \
//!     -p 5432:5432 postgres:16
//! cargo test --test postgres_bench -- --ignored --test-threads=1

use chrono::Utc;
use keyorder_bench::bench::{OrderingOutcome, SystemClock, run_ordering_bench, run_workload};
use keyorder_bench::config::{AppConfig, OrderingParams, WorkloadParams};
use keyorder_bench::db::Database;
use keyorder_bench::store::{PgStore, ProductOrder, RecordStore};
use keyorder_bench::{IdGenerator, IdStrategy, Table};

async fn connect() -> PgStore {
    let config = AppConfig::load("ci").expect("config/ci.yaml");
    let db = Database::connect(&config.database)
        .await
        .expect("Failed to connect");
    let store = PgStore::from_database(&db);
    store.migrate().await.expect("migrate");
    store
}

#[tokio::test]
#[ignore] // Requires PostgreSQL running
async fn pg_time_ordered_ids_preserve_insert_order() {
    let store = connect().await;
    let mut ids = IdGenerator::seeded(IdStrategy::TimeOrdered, 42);

    let report = run_ordering_bench(&store, &SystemClock, &mut ids, &OrderingParams::default(), 1)
        .await
        .expect("ordering benchmark");

    assert_eq!(report.outcome, OrderingOutcome::Consistent);
    assert_eq!(store.count(Table::Products).await.unwrap(), 100);
}

#[tokio::test]
#[ignore]
async fn pg_random_ids_break_insert_order() {
    let store = connect().await;
    let mut ids = IdGenerator::seeded(IdStrategy::Random, 42);

    let report = run_ordering_bench(&store, &SystemClock, &mut ids, &OrderingParams::default(), 1)
        .await
        .expect("random run reports instead of failing");

    assert!(!report.outcome.is_consistent());
}

#[tokio::test]
#[ignore]
async fn pg_round_trip_and_soft_delete() {
    let store = connect().await;
    store.purge_products().await.unwrap();

    let mut ids = IdGenerator::seeded(IdStrategy::TimeOrdered, 1);
    let meta = ids.stamp(Utc::now()).unwrap();
    let product = keyorder_bench::Product::new(meta, "D42", 100);
    store.insert_product(&product).await.unwrap();

    let listed = store.list_products(ProductOrder::Id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].meta.id(), product.meta.id());
    assert_eq!(listed[0].price, 100);

    assert!(store.soft_delete_product(product.meta.id(), Utc::now()).await.unwrap());
    assert!(store.list_products(ProductOrder::Id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn pg_clinic_workload() {
    let store = connect().await;
    let mut ids = IdGenerator::seeded(IdStrategy::TimeOrdered, 5);
    let params = WorkloadParams {
        samples: 20,
        ..WorkloadParams::default()
    };

    let report = run_workload(&store, &SystemClock, &mut ids, &params, 1)
        .await
        .expect("workload");
    assert_eq!(report.rows.total(), 20 * params.rows_per_sample() as u64);
}
