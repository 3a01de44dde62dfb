//! Insert latency metrics
//!
//! Collects per-insert latency samples for percentile reporting next to the
//! total wall-clock time of a run.

use serde::Serialize;
use std::time::Duration;

/// Per-insert latency collector
/// Keeps every Nth sample so long workloads stay bounded in memory
#[derive(Default)]
pub struct InsertMetrics {
    pub inserts: u64,
    pub total_insert_ns: u64,

    pub latency_samples: Vec<u64>,
    sample_rate: usize,
    sample_counter: usize,
}

/// Point-in-time view of [`InsertMetrics`], all values in microseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LatencySummary {
    pub inserts: u64,
    pub samples: usize,
    /// Time spent inside insert calls, every insert counted
    pub total_insert_us: f64,
    pub min_us: Option<f64>,
    pub avg_us: Option<f64>,
    pub p50_us: Option<f64>,
    pub p99_us: Option<f64>,
    pub max_us: Option<f64>,
}

impl InsertMetrics {
    /// Create new metrics collector with given sample rate
    ///
    /// # Arguments
    /// * `sample_rate` - Sample every Nth insert for latency percentiles (0 is treated as 1)
    pub fn new(sample_rate: usize) -> Self {
        InsertMetrics {
            sample_rate: sample_rate.max(1),
            latency_samples: Vec::with_capacity(1_024),
            ..Default::default()
        }
    }

    /// Record one insert (sampled for percentiles, always counted in totals)
    #[inline]
    pub fn add_insert(&mut self, latency: Duration) {
        let ns = latency.as_nanos() as u64;
        self.inserts += 1;
        self.total_insert_ns += ns;

        self.sample_counter += 1;
        if self.sample_counter >= self.sample_rate {
            self.latency_samples.push(ns);
            self.sample_counter = 0;
        }
    }

    /// Calculate percentile from samples
    ///
    /// # Arguments
    /// * `p` - Percentile (0-100), e.g., 50.0 for median, 99.0 for P99
    pub fn percentile(&self, p: f64) -> Option<u64> {
        if self.latency_samples.is_empty() {
            return None;
        }
        let mut sorted = self.latency_samples.clone();
        sorted.sort_unstable();
        let idx = ((p / 100.0) * (sorted.len() - 1) as f64).round() as usize;
        Some(sorted[idx.min(sorted.len() - 1)])
    }

    pub fn min_latency(&self) -> Option<u64> {
        self.latency_samples.iter().copied().min()
    }

    pub fn max_latency(&self) -> Option<u64> {
        self.latency_samples.iter().copied().max()
    }

    pub fn avg_latency(&self) -> Option<u64> {
        if self.latency_samples.is_empty() {
            return None;
        }
        Some(self.latency_samples.iter().sum::<u64>() / self.latency_samples.len() as u64)
    }

    pub fn summary(&self) -> LatencySummary {
        let us = |ns: Option<u64>| ns.map(|v| v as f64 / 1_000.0);
        LatencySummary {
            inserts: self.inserts,
            samples: self.latency_samples.len(),
            total_insert_us: self.total_insert_ns as f64 / 1_000.0,
            min_us: us(self.min_latency()),
            avg_us: us(self.avg_latency()),
            p50_us: us(self.percentile(50.0)),
            p99_us: us(self.percentile(99.0)),
            max_us: us(self.max_latency()),
        }
    }
}
