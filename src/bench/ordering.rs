//! Insert-order benchmark
//!
//! Inserts N products one at a time, then reads them back twice, ordered by
//! `created_at` and by `id`. With time-ordered ids and at least a millisecond
//! between inserts, both listings must be the same sequence.

use std::time::Instant;

use rand::RngCore;
use serde::Serialize;

use super::clock::Clock;
use super::report::OrderingReport;
use crate::config::OrderingParams;
use crate::error::BenchError;
use crate::id::{IdGenerator, RecordId};
use crate::models::Product;
use crate::perf::InsertMetrics;
use crate::store::{ProductOrder, RecordStore};

/// Result of comparing the two listings position by position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OrderingOutcome {
    Consistent,
    Diverged {
        first_index: usize,
        by_created: RecordId,
        by_id: RecordId,
        mismatches: usize,
    },
}

impl OrderingOutcome {
    pub fn is_consistent(&self) -> bool {
        matches!(self, OrderingOutcome::Consistent)
    }
}

/// Compare two id sequences of equal length
pub fn compare_orderings(by_created: &[RecordId], by_id: &[RecordId]) -> OrderingOutcome {
    let mut first = None;
    let mut mismatches = 0;

    for (index, (a, b)) in by_created.iter().zip(by_id).enumerate() {
        if a != b {
            mismatches += 1;
            first.get_or_insert((index, *a, *b));
        }
    }

    match first {
        None => OrderingOutcome::Consistent,
        Some((first_index, by_created, by_id)) => OrderingOutcome::Diverged {
            first_index,
            by_created,
            by_id,
            mismatches,
        },
    }
}

pub async fn run_ordering_bench<S, C, R>(
    store: &S,
    clock: &C,
    ids: &mut IdGenerator<R>,
    params: &OrderingParams,
    metrics_sample_rate: usize,
) -> Result<OrderingReport, BenchError>
where
    S: RecordStore + ?Sized,
    C: Clock + ?Sized,
    R: RngCore,
{
    let strategy = ids.strategy();
    let delay = params.delay();
    tracing::info!(
        store = store.name(),
        %strategy,
        records = params.records,
        delay_ms = params.delay_ms,
        "Starting ordering benchmark"
    );

    store.purge_products().await?;

    let mut metrics = InsertMetrics::new(metrics_sample_rate);
    let start = Instant::now();
    for _ in 0..params.records {
        let meta = ids.stamp(clock.now())?;
        let product = Product::new(meta, params.code.as_str(), params.price);

        let t = Instant::now();
        store.insert_product(&product).await?;
        metrics.add_insert(t.elapsed());

        if !delay.is_zero() {
            clock.sleep(delay).await;
        }
    }
    let elapsed = start.elapsed();
    tracing::info!("Inserting {} records took {:?}", params.records, elapsed);

    let by_created = product_ids(store, ProductOrder::CreatedAt, params.records).await?;
    let by_id = product_ids(store, ProductOrder::Id, params.records).await?;

    let outcome = compare_orderings(&by_created, &by_id);
    match &outcome {
        OrderingOutcome::Consistent => {
            tracing::info!("created_at order and id order are identical")
        }
        OrderingOutcome::Diverged {
            first_index,
            by_created,
            by_id,
            mismatches,
        } => {
            if strategy.is_time_ordered() {
                tracing::error!(
                    index = first_index,
                    mismatches,
                    "They are not the same at {}",
                    first_index
                );
                return Err(BenchError::OrderingMismatch {
                    index: *first_index,
                    by_created: *by_created,
                    by_id: *by_id,
                });
            }
            tracing::info!(
                index = first_index,
                mismatches,
                "{} ids do not follow insertion order (first at {})",
                strategy,
                first_index
            );
        }
    }

    Ok(OrderingReport {
        store: store.name(),
        strategy,
        records: params.records,
        delay_ms: params.delay_ms,
        elapsed,
        latency: metrics.summary(),
        outcome,
    })
}

async fn product_ids<S: RecordStore + ?Sized>(
    store: &S,
    order: ProductOrder,
    expected: usize,
) -> Result<Vec<RecordId>, BenchError> {
    let products = store.list_products(order).await?;
    if products.len() != expected {
        return Err(BenchError::RowCount {
            table: "products",
            expected: expected as u64,
            actual: products.len() as u64,
        });
    }
    Ok(products.iter().map(|p| p.meta.id()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::clock::ManualClock;
    use crate::id::IdStrategy;
    use crate::store::MemoryStore;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn id(n: u128) -> RecordId {
        RecordId::from(Uuid::from_u128(n))
    }

    fn clock() -> ManualClock {
        ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap())
    }

    #[test]
    fn test_compare_identical() {
        let ids = vec![id(1), id(2), id(3)];
        assert!(compare_orderings(&ids, &ids).is_consistent());
        assert!(compare_orderings(&[], &[]).is_consistent());
    }

    #[test]
    fn test_compare_reports_first_index_and_count() {
        let a = vec![id(1), id(2), id(3), id(4)];
        let b = vec![id(1), id(3), id(2), id(4)];
        assert_eq!(
            compare_orderings(&a, &b),
            OrderingOutcome::Diverged {
                first_index: 1,
                by_created: id(2),
                by_id: id(3),
                mismatches: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_time_ordered_run_is_consistent() {
        let store = MemoryStore::new();
        let mut ids = IdGenerator::seeded(IdStrategy::TimeOrdered, 42);
        let params = OrderingParams::default();

        let report = run_ordering_bench(&store, &clock(), &mut ids, &params, 1)
            .await
            .unwrap();

        assert!(report.outcome.is_consistent());
        assert_eq!(report.records, 100);
        assert_eq!(report.latency.inserts, 100);
    }

    #[tokio::test]
    async fn test_random_run_diverges_without_failing() {
        let store = MemoryStore::new();
        let mut ids = IdGenerator::seeded(IdStrategy::Random, 42);
        let params = OrderingParams::default();

        let report = run_ordering_bench(&store, &clock(), &mut ids, &params, 1)
            .await
            .unwrap();

        assert!(matches!(
            report.outcome,
            OrderingOutcome::Diverged { mismatches, .. } if mismatches > 0
        ));
    }

    #[tokio::test]
    async fn test_same_millisecond_inserts_fail_the_check() {
        let store = MemoryStore::new();
        let mut ids = IdGenerator::seeded(IdStrategy::TimeOrdered, 42);
        let params = OrderingParams {
            delay_ms: 0,
            ..OrderingParams::default()
        };

        let err = run_ordering_bench(&store, &clock(), &mut ids, &params, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, BenchError::OrderingMismatch { .. }));
    }

    #[tokio::test]
    async fn test_previous_rows_are_purged() {
        let store = MemoryStore::new();
        let clock = clock();
        let params = OrderingParams {
            records: 10,
            ..OrderingParams::default()
        };

        let mut ids = IdGenerator::seeded(IdStrategy::TimeOrdered, 1);
        run_ordering_bench(&store, &clock, &mut ids, &params, 1)
            .await
            .unwrap();
        let report = run_ordering_bench(&store, &clock, &mut ids, &params, 1)
            .await
            .unwrap();

        assert!(report.outcome.is_consistent());
        assert_eq!(
            store.count(crate::models::Table::Products).await.unwrap(),
            10
        );
    }
}
