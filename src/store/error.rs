use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration step '{step}' failed: {source}")]
    Migration {
        step: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Column '{column}' holds an unexpected value: {reason}")]
    Decode { column: &'static str, reason: String },

    #[error("{table} row references missing {parent} {id}")]
    MissingParent {
        table: &'static str,
        parent: &'static str,
        id: crate::id::RecordId,
    },

    #[error("Duplicate primary key {0}")]
    DuplicateKey(crate::id::RecordId),

    #[error("In-memory store lock poisoned")]
    Poisoned,
}
