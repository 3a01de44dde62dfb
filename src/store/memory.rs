//! In-memory record store
//!
//! Rows are kept in insertion order. `ORDER BY created_at` is a stable sort,
//! so rows sharing a timestamp keep insertion order, and `ORDER BY id` sorts
//! by unsigned identifier bytes like PostgreSQL's `uuid` ordering.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{ProductOrder, RecordStore, StoreError};
use crate::id::RecordId;
use crate::models::{Employee, Patient, Product, RecordMeta, Session, Table};

#[derive(Default)]
struct Tables {
    products: Vec<Product>,
    employees: Vec<Employee>,
    patients: Vec<Patient>,
    sessions: Vec<Session>,
    keys: HashSet<(Table, RecordId)>,
}

impl Tables {
    fn claim_key(&mut self, table: Table, id: RecordId) -> Result<(), StoreError> {
        if self.keys.insert((table, id)) {
            Ok(())
        } else {
            Err(StoreError::DuplicateKey(id))
        }
    }

    fn has_key(&self, table: Table, id: RecordId) -> bool {
        self.keys.contains(&(table, id))
    }

    fn forget_table(&mut self, table: Table) {
        self.keys.retain(|(t, _)| *t != table);
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn live_count<T>(rows: &[T], meta: impl Fn(&T) -> &RecordMeta) -> u64 {
    rows.iter().filter(|r| !meta(*r).is_deleted()).count() as u64
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn purge_products(&self) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        tables.products.clear();
        tables.forget_table(Table::Products);
        Ok(())
    }

    async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        tables.claim_key(Table::Products, product.meta.id())?;
        tables.products.push(product.clone());
        Ok(())
    }

    async fn soft_delete_product(
        &self,
        id: RecordId,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let mut tables = self.lock()?;
        match tables
            .products
            .iter_mut()
            .find(|p| p.meta.id() == id && !p.meta.is_deleted())
        {
            Some(product) => {
                product.meta.mark_deleted(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_products(&self, order: ProductOrder) -> Result<Vec<Product>, StoreError> {
        let tables = self.lock()?;
        let mut live: Vec<Product> = tables
            .products
            .iter()
            .filter(|p| !p.meta.is_deleted())
            .cloned()
            .collect();

        match order {
            ProductOrder::CreatedAt => live.sort_by_key(|p| p.meta.created_at()),
            ProductOrder::Id => live.sort_by_key(|p| p.meta.id()),
        }
        Ok(live)
    }

    async fn purge_clinic(&self) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        tables.sessions.clear();
        tables.patients.clear();
        tables.employees.clear();
        for table in [Table::Sessions, Table::Patients, Table::Employees] {
            tables.forget_table(table);
        }
        Ok(())
    }

    async fn insert_employee(&self, employee: &Employee) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        tables.claim_key(Table::Employees, employee.meta.id())?;
        tables.employees.push(employee.clone());
        Ok(())
    }

    async fn insert_patient(&self, patient: &Patient) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        if !tables.has_key(Table::Employees, patient.employee_id) {
            return Err(StoreError::MissingParent {
                table: "patients",
                parent: "employee",
                id: patient.employee_id,
            });
        }
        tables.claim_key(Table::Patients, patient.meta.id())?;
        tables.patients.push(patient.clone());
        Ok(())
    }

    async fn insert_session(&self, session: &Session) -> Result<(), StoreError> {
        let mut tables = self.lock()?;
        if !tables.has_key(Table::Patients, session.patient_id) {
            return Err(StoreError::MissingParent {
                table: "sessions",
                parent: "patient",
                id: session.patient_id,
            });
        }
        tables.claim_key(Table::Sessions, session.meta.id())?;
        tables.sessions.push(session.clone());
        Ok(())
    }

    async fn count(&self, table: Table) -> Result<u64, StoreError> {
        let tables = self.lock()?;
        let live = match table {
            Table::Products => live_count(&tables.products, |r| &r.meta),
            Table::Employees => live_count(&tables.employees, |r| &r.meta),
            Table::Patients => live_count(&tables.patients, |r| &r.meta),
            Table::Sessions => live_count(&tables.sessions, |r| &r.meta),
        };
        Ok(live)
    }
}
