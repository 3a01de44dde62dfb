//! Persisted record shapes
//!
//! Every table shares the [`RecordMeta`] columns (`id`, `created_at`,
//! `updated_at`, `deleted_at`). The id is assigned once by
//! [`IdGenerator::stamp`](crate::id::IdGenerator::stamp) and has no setter.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::id::RecordId;

/// Shared record metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordMeta {
    id: RecordId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl RecordMeta {
    pub(crate) fn new(id: RecordId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Rebuild metadata read back from a store
    pub(crate) fn restore(
        id: RecordId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        deleted_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            created_at,
            updated_at,
            deleted_at,
        }
    }

    #[inline]
    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Soft delete: the row stays, the id is untouched.
    pub fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
        self.updated_at = at;
    }
}

// ============================================================================
// Ordering benchmark
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub meta: RecordMeta,
    pub code: String,
    pub price: u32,
}

impl Product {
    pub fn new(meta: RecordMeta, code: impl Into<String>, price: u32) -> Self {
        Self {
            meta,
            code: code.into(),
            price,
        }
    }
}

// ============================================================================
// Clinic workload (employee -> patients -> sessions)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub meta: RecordMeta,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub employment_status: String,
    pub street: String,
    pub house_number: String,
    pub city: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patient {
    pub meta: RecordMeta,
    pub first_name: String,
    pub last_name: String,
    pub employee_id: RecordId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub meta: RecordMeta,
    pub notes: String,
    pub patient_id: RecordId,
}

/// Tables managed by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Products,
    Employees,
    Patients,
    Sessions,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Products => "products",
            Table::Employees => "employees",
            Table::Patients => "patients",
            Table::Sessions => "sessions",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{IdGenerator, IdStrategy};
    use chrono::Duration;

    #[test]
    fn test_mark_deleted_keeps_identity() {
        let mut ids = IdGenerator::seeded(IdStrategy::TimeOrdered, 1);
        let now = Utc::now();
        let mut meta = ids.stamp(now).unwrap();
        let id = meta.id();

        let later = now + Duration::seconds(5);
        meta.mark_deleted(later);

        assert!(meta.is_deleted());
        assert_eq!(meta.id(), id);
        assert_eq!(meta.created_at(), now);
        assert_eq!(meta.updated_at(), later);
        assert_eq!(meta.deleted_at(), Some(later));
    }

    #[test]
    fn test_table_names() {
        assert_eq!(Table::Products.name(), "products");
        assert_eq!(Table::Sessions.name(), "sessions");
    }
}
