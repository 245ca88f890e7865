//! Idempotent schema bootstrap. Safe to run on every startup.

use sqlx::SqlitePool;

const DDL: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS transaction_counter (
         id INTEGER PRIMARY KEY CHECK (id = 1),
         total_transactions INTEGER NOT NULL DEFAULT 0,
         license_status TEXT NOT NULL DEFAULT 'trial',
         serial_number TEXT,
         hardware_id TEXT,
         activation_date TEXT,
         last_validation TEXT,
         temporary_until TEXT
     )",
    "INSERT OR IGNORE INTO transaction_counter (id) VALUES (1)",
    "CREATE TABLE IF NOT EXISTS preloaded_serials (
         serial_number TEXT PRIMARY KEY,
         valid INTEGER NOT NULL DEFAULT 1,
         max_installations INTEGER NOT NULL DEFAULT 1,
         license_type TEXT NOT NULL DEFAULT 'standard',
         generated_date TEXT
     )",
    "CREATE TABLE IF NOT EXISTS validation_queue (
         serial_number TEXT PRIMARY KEY,
         hardware_id TEXT NOT NULL,
         queued_at TEXT NOT NULL,
         attempts INTEGER NOT NULL DEFAULT 0,
         status TEXT NOT NULL DEFAULT 'pending'
     )",
    "CREATE TABLE IF NOT EXISTS local_activations (
         id TEXT PRIMARY KEY,
         serial_number TEXT NOT NULL,
         hardware_id TEXT NOT NULL,
         temporary INTEGER NOT NULL DEFAULT 0,
         activated_at TEXT NOT NULL
     )",
];

/// Create the four tables and the counter singleton row if absent.
pub(crate) async fn init(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in DDL {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
