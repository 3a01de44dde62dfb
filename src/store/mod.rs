//! Record storage
//!
//! [`RecordStore`] is the seam between the benchmark drivers and the database.
//!
//! - [`postgres::PgStore`] - sqlx / PostgreSQL, the thing being measured
//! - [`memory::MemoryStore`] - in-process tables for tests and dry runs
//!
//! Listings never include soft-deleted rows. Purges are hard deletes.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod schema;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::id::RecordId;
use crate::models::{Employee, Patient, Product, Session, Table};

/// Sort key for product listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductOrder {
    CreatedAt,
    Id,
}

impl ProductOrder {
    pub fn column(&self) -> &'static str {
        match self {
            ProductOrder::CreatedAt => "created_at",
            ProductOrder::Id => "id",
        }
    }
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Backend name for logging
    fn name(&self) -> &'static str;

    /// Create tables and indexes if they do not exist
    async fn migrate(&self) -> Result<(), StoreError>;

    /// Hard delete every product, soft-deleted ones included
    async fn purge_products(&self) -> Result<(), StoreError>;

    async fn insert_product(&self, product: &Product) -> Result<(), StoreError>;

    /// Returns false when no live product has this id
    async fn soft_delete_product(
        &self,
        id: RecordId,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError>;

    async fn list_products(&self, order: ProductOrder) -> Result<Vec<Product>, StoreError>;

    /// Hard delete sessions, patients and employees, children first
    async fn purge_clinic(&self) -> Result<(), StoreError>;

    async fn insert_employee(&self, employee: &Employee) -> Result<(), StoreError>;

    async fn insert_patient(&self, patient: &Patient) -> Result<(), StoreError>;

    async fn insert_session(&self, session: &Session) -> Result<(), StoreError>;

    /// Live rows in `table`
    async fn count(&self, table: Table) -> Result<u64, StoreError>;
}
