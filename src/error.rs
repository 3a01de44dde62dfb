use thiserror::Error;

use crate::config::ConfigError;
use crate::id::{IdError, RecordId};
use crate::store::StoreError;

/// Everything that ends a benchmark run. None of these are retried.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database setup failed: {0}")]
    Setup(#[from] sqlx::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Identifier generation failed: {0}")]
    IdGeneration(#[from] IdError),

    #[error("{table}: expected {expected} rows, store returned {actual}")]
    RowCount {
        table: &'static str,
        expected: u64,
        actual: u64,
    },

    #[error(
        "Orderings diverge at index {index}: created_at order has {by_created}, id order has {by_id}"
    )]
    OrderingMismatch {
        index: usize,
        by_created: RecordId,
        by_id: RecordId,
    },
}
