//! keyorder_bench - primary-key ordering benchmark
//!
//! Compares random UUID primary keys with time-ordered (ULID layout) keys on
//! PostgreSQL: insert throughput, and whether `ORDER BY id` reproduces
//! insertion order.
//!
//! # Modules
//!
//! - [`id`] - RecordId, IdStrategy and the seedable IdGenerator
//! - [`models`] - Persisted record shapes (Product, Employee, Patient, Session)
//! - [`store`] - RecordStore trait, PostgreSQL and in-memory implementations
//! - [`db`] - PostgreSQL connection pool
//! - [`bench`] - Ordering benchmark and clinic workload drivers
//! - [`perf`] - Insert latency metrics
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing subscriber setup
//! - [`error`] - BenchError

pub mod config;
pub mod error;
pub mod logging;

pub mod bench;
pub mod db;
pub mod id;
pub mod models;
pub mod perf;
pub mod store;

// Convenient re-exports at crate root
pub use bench::{OrderingOutcome, OrderingReport, WorkloadReport};
pub use error::BenchError;
pub use id::{IdGenerator, IdStrategy, RecordId};
pub use models::{Employee, Patient, Product, RecordMeta, Session, Table};
pub use store::{MemoryStore, PgStore, ProductOrder, RecordStore, StoreError};
