//! Benchmark drivers
//!
//! Single-threaded and strictly sequential: one insert in flight at a time,
//! so timings reflect identifier behaviour and not scheduling.
//!
//! # Components
//!
//! - [`ordering`] - insert N products, compare `created_at` order with `id` order
//! - [`workload`] - employee / patient / session insert workload
//! - [`clock`] - wall clock and manual clock
//! - [`report`] - serializable run reports

pub mod clock;
pub mod ordering;
pub mod report;
pub mod workload;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ordering::{OrderingOutcome, compare_orderings, run_ordering_bench};
pub use report::{OrderingReport, WorkloadReport};
pub use workload::{WorkloadRows, run_workload};
