//! PostgreSQL DDL
//!
//! Applied in order by [`PgStore::migrate`](super::PgStore). Each statement is
//! idempotent, so migrating an existing database is a no-op.

/// (step name, statement)
pub const MIGRATIONS: &[(&str, &str)] = &[
    ("create products", CREATE_PRODUCTS_TABLE),
    ("index products.deleted_at", CREATE_PRODUCTS_DELETED_AT_INDEX),
    ("create employees", CREATE_EMPLOYEES_TABLE),
    ("index employees.deleted_at", CREATE_EMPLOYEES_DELETED_AT_INDEX),
    ("create patients", CREATE_PATIENTS_TABLE),
    ("index patients.deleted_at", CREATE_PATIENTS_DELETED_AT_INDEX),
    ("create sessions", CREATE_SESSIONS_TABLE),
    ("index sessions.deleted_at", CREATE_SESSIONS_DELETED_AT_INDEX),
];

pub const CREATE_PRODUCTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id          UUID PRIMARY KEY,
    created_at  TIMESTAMPTZ NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL,
    deleted_at  TIMESTAMPTZ,
    code        TEXT NOT NULL,
    price       BIGINT NOT NULL
)
"#;

pub const CREATE_PRODUCTS_DELETED_AT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_products_deleted_at ON products (deleted_at)";

pub const CREATE_EMPLOYEES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS employees (
    id                 UUID PRIMARY KEY,
    created_at         TIMESTAMPTZ NOT NULL,
    updated_at         TIMESTAMPTZ NOT NULL,
    deleted_at         TIMESTAMPTZ,
    first_name         TEXT NOT NULL,
    last_name          TEXT NOT NULL,
    age                BIGINT NOT NULL,
    employment_status  TEXT NOT NULL,
    street             TEXT NOT NULL,
    house_number       TEXT NOT NULL,
    city               TEXT NOT NULL,
    postal_code        TEXT NOT NULL
)
"#;

pub const CREATE_EMPLOYEES_DELETED_AT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_employees_deleted_at ON employees (deleted_at)";

pub const CREATE_PATIENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS patients (
    id           UUID PRIMARY KEY,
    created_at   TIMESTAMPTZ NOT NULL,
    updated_at   TIMESTAMPTZ NOT NULL,
    deleted_at   TIMESTAMPTZ,
    first_name   TEXT NOT NULL,
    last_name    TEXT NOT NULL,
    employee_id  UUID NOT NULL REFERENCES employees (id)
)
"#;

pub const CREATE_PATIENTS_DELETED_AT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_patients_deleted_at ON patients (deleted_at)";

pub const CREATE_SESSIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    id          UUID PRIMARY KEY,
    created_at  TIMESTAMPTZ NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL,
    deleted_at  TIMESTAMPTZ,
    notes       TEXT NOT NULL,
    patient_id  UUID NOT NULL REFERENCES patients (id)
)
"#;

pub const CREATE_SESSIONS_DELETED_AT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_sessions_deleted_at ON sessions (deleted_at)";
