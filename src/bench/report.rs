//! Run reports: logged through tracing, optionally printed as JSON.

use serde::{Serialize, Serializer};
use std::time::Duration;

use super::ordering::OrderingOutcome;
use super::workload::WorkloadRows;
use crate::id::IdStrategy;
use crate::perf::LatencySummary;

fn as_millis<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64() * 1_000.0)
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderingReport {
    pub store: &'static str,
    pub strategy: IdStrategy,
    pub records: usize,
    pub delay_ms: u64,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
    pub latency: LatencySummary,
    pub outcome: OrderingOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkloadReport {
    pub store: &'static str,
    pub strategy: IdStrategy,
    pub samples: usize,
    pub rows: WorkloadRows,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
    pub latency: LatencySummary,
}

/// Inserts per second over the whole timed loop
fn throughput(rows: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    rows as f64 / secs
}

impl OrderingReport {
    pub fn inserts_per_sec(&self) -> f64 {
        throughput(self.records as u64, self.elapsed)
    }

    pub fn log_summary(&self) {
        tracing::info!(
            store = self.store,
            strategy = %self.strategy,
            records = self.records,
            elapsed_ms = self.elapsed.as_secs_f64() * 1_000.0,
            inserts_per_sec = self.inserts_per_sec(),
            insert_total_us = self.latency.total_insert_us,
            p50_us = ?self.latency.p50_us,
            p99_us = ?self.latency.p99_us,
            consistent = self.outcome.is_consistent(),
            "ordering benchmark finished"
        );
    }
}

impl WorkloadReport {
    pub fn inserts_per_sec(&self) -> f64 {
        throughput(self.rows.total(), self.elapsed)
    }

    pub fn log_summary(&self) {
        tracing::info!(
            store = self.store,
            strategy = %self.strategy,
            samples = self.samples,
            rows = self.rows.total(),
            elapsed_ms = self.elapsed.as_secs_f64() * 1_000.0,
            inserts_per_sec = self.inserts_per_sec(),
            insert_total_us = self.latency.total_insert_us,
            p50_us = ?self.latency.p50_us,
            p99_us = ?self.latency.p99_us,
            "clinic workload finished"
        );
    }
}
