use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::info;

use crate::auth::password::hash_password;
use crate::model::employee::Gender;

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "password123";

const USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    email       TEXT NOT NULL UNIQUE,
    password    TEXT NOT NULL,
    birth_date  TEXT NOT NULL,
    gender      TEXT NOT NULL CHECK (gender IN ('male', 'female')),
    role        TEXT NOT NULL DEFAULT 'admin',
    created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

const EMPLOYEES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS employees (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name   TEXT NOT NULL,
    last_name    TEXT NOT NULL,
    email        TEXT NOT NULL UNIQUE,
    phone_number TEXT NOT NULL,
    address      TEXT NOT NULL,
    gender       TEXT NOT NULL CHECK (gender IN ('male', 'female')),
    created_at   TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at   TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

const LEAVE_RECORDS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS leave_records (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    employee_id INTEGER NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
    reason      TEXT NOT NULL,
    start_date  TEXT NOT NULL,
    end_date    TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

const LEAVE_RECORDS_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS idx_leave_records_employee_start
    ON leave_records (employee_id, start_date)
"#;

/// Opens the pool. A single connection on purpose: it serializes the
/// leave admission check-then-write across requests, and it keeps a
/// `sqlite::memory:` URL pointed at one database instead of one per
/// pooled connection.
pub async fn init_db(database_url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .context("invalid DATABASE_URL")?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .context("failed to connect to database")?;

    Ok(pool)
}

/// Brings the schema up. Every statement is idempotent, so this runs on
/// each start.
pub async fn migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    for statement in [
        USERS_TABLE,
        EMPLOYEES_TABLE,
        LEAVE_RECORDS_TABLE,
        LEAVE_RECORDS_INDEX,
    ] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("failed to apply schema statement")?;
    }

    Ok(())
}

/// Inserts the default admin unless that email is already taken.
pub async fn seed_default_admin(pool: &SqlitePool) -> anyhow::Result<()> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
        .bind(DEFAULT_ADMIN_EMAIL)
        .fetch_optional(pool)
        .await
        .context("failed to look up default admin")?;

    if existing.is_some() {
        return Ok(());
    }

    let hashed = hash_password(DEFAULT_ADMIN_PASSWORD)?;
    let today = chrono::Local::now().date_naive();

    sqlx::query(
        r#"
        INSERT INTO users (first_name, last_name, email, password, birth_date, gender, role)
        VALUES (?, ?, ?, ?, ?, ?, 'admin')
        "#,
    )
    .bind("Admin")
    .bind("Core")
    .bind(DEFAULT_ADMIN_EMAIL)
    .bind(&hashed)
    .bind(today)
    .bind(Gender::Male)
    .execute(pool)
    .await
    .context("failed to seed default admin")?;

    info!(email = DEFAULT_ADMIN_EMAIL, "Seeded default admin account");

    Ok(())
}
