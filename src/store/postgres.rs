//! PostgreSQL record store
//!
//! Timestamps are bound from the client, matching the in-memory store, so the
//! `created_at` a row carries is the same instant its id was generated from.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::schema::MIGRATIONS;
use super::{ProductOrder, RecordStore, StoreError};
use crate::db::Database;
use crate::id::RecordId;
use crate::models::{Employee, Patient, Product, RecordMeta, Session, Table};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn from_database(db: &Database) -> Self {
        Self::new(db.pool().clone())
    }

    fn row_to_product(row: &PgRow) -> Result<Product, StoreError> {
        let price: i64 = row.try_get("price")?;
        let price = u32::try_from(price).map_err(|e| StoreError::Decode {
            column: "price",
            reason: e.to_string(),
        })?;

        Ok(Product {
            meta: row_to_meta(row)?,
            code: row.try_get("code")?,
            price,
        })
    }

    async fn exec(&self, sql: &str) -> Result<(), StoreError> {
        sqlx::query(sql).execute(&self.pool).await?;
        Ok(())
    }
}

fn row_to_meta(row: &PgRow) -> Result<RecordMeta, StoreError> {
    let id: Uuid = row.try_get("id")?;
    Ok(RecordMeta::restore(
        RecordId::from(id),
        row.try_get("created_at")?,
        row.try_get("updated_at")?,
        row.try_get("deleted_at")?,
    ))
}

#[async_trait]
impl RecordStore for PgStore {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        for &(step, sql) in MIGRATIONS {
            sqlx::query(sql)
                .execute(&self.pool)
                .await
                .map_err(|source| StoreError::Migration { step, source })?;
            tracing::debug!(step, "migration applied");
        }
        tracing::info!("Schema migrated ({} steps)", MIGRATIONS.len());
        Ok(())
    }

    async fn purge_products(&self) -> Result<(), StoreError> {
        self.exec("DELETE FROM products").await
    }

    async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO products (id, created_at, updated_at, deleted_at, code, price)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(product.meta.id().as_uuid())
        .bind(product.meta.created_at())
        .bind(product.meta.updated_at())
        .bind(product.meta.deleted_at())
        .bind(&product.code)
        .bind(i64::from(product.price))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn soft_delete_product(
        &self,
        id: RecordId,
        at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE products SET deleted_at = $2, updated_at = $2
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.as_uuid())
        .bind(at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_products(&self, order: ProductOrder) -> Result<Vec<Product>, StoreError> {
        let sql = format!(
            r#"SELECT id, created_at, updated_at, deleted_at, code, price
               FROM products WHERE deleted_at IS NULL ORDER BY {}"#,
            order.column()
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_product).collect()
    }

    async fn purge_clinic(&self) -> Result<(), StoreError> {
        self.exec("DELETE FROM sessions").await?;
        self.exec("DELETE FROM patients").await?;
        self.exec("DELETE FROM employees").await
    }

    async fn insert_employee(&self, employee: &Employee) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO employees
                (id, created_at, updated_at, deleted_at, first_name, last_name, age,
                 employment_status, street, house_number, city, postal_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(employee.meta.id().as_uuid())
        .bind(employee.meta.created_at())
        .bind(employee.meta.updated_at())
        .bind(employee.meta.deleted_at())
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(i64::from(employee.age))
        .bind(&employee.employment_status)
        .bind(&employee.street)
        .bind(&employee.house_number)
        .bind(&employee.city)
        .bind(&employee.postal_code)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_patient(&self, patient: &Patient) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO patients
                (id, created_at, updated_at, deleted_at, first_name, last_name, employee_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(patient.meta.id().as_uuid())
        .bind(patient.meta.created_at())
        .bind(patient.meta.updated_at())
        .bind(patient.meta.deleted_at())
        .bind(&patient.first_name)
        .bind(&patient.last_name)
        .bind(patient.employee_id.as_uuid())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_session(&self, session: &Session) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, created_at, updated_at, deleted_at, notes, patient_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(session.meta.id().as_uuid())
        .bind(session.meta.created_at())
        .bind(session.meta.updated_at())
        .bind(session.meta.deleted_at())
        .bind(&session.notes)
        .bind(session.patient_id.as_uuid())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn count(&self, table: Table) -> Result<u64, StoreError> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE deleted_at IS NULL",
            table.name()
        );
        let n = sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(n as u64)
    }
}
