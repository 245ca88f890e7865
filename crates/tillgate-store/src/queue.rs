//! Validation retry queue — offline-accepted serials awaiting
//! confirmation against the authoritative server.
//!
//! Write-only in this subsystem: entries are upserted when an offline
//! activation provisionally trusts an unrecognized serial. A scheduled
//! reconciliation worker (external to this core) drains [`pending`] and
//! updates `attempts`/`status`.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// Status value for entries awaiting reconciliation.
pub const STATUS_PENDING: &str = "pending";

/// One queued reconciliation entry.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct QueueEntry {
    pub serial_number: String,
    pub hardware_id: String,
    pub queued_at: DateTime<Utc>,
    pub attempts: i64,
    pub status: String,
}

/// Upsert a pending entry keyed by serial: a re-activation of the same
/// serial refreshes the timestamp and resets the attempt counter rather
/// than creating a duplicate row.
pub async fn enqueue(pool: &SqlitePool, serial: &str, hardware_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO validation_queue (serial_number, hardware_id, queued_at, attempts, status)
         VALUES (?1, ?2, ?3, 0, ?4)
         ON CONFLICT(serial_number) DO UPDATE SET
             hardware_id = excluded.hardware_id,
             queued_at = excluded.queued_at,
             attempts = 0,
             status = excluded.status",
    )
    .bind(serial)
    .bind(hardware_id)
    .bind(Utc::now())
    .bind(STATUS_PENDING)
    .execute(pool)
    .await?;
    Ok(())
}

/// Entries still awaiting reconciliation, oldest first.
pub async fn pending(pool: &SqlitePool) -> Result<Vec<QueueEntry>, sqlx::Error> {
    sqlx::query_as::<_, QueueEntry>(
        "SELECT serial_number, hardware_id, queued_at, attempts, status
         FROM validation_queue WHERE status = ?1 ORDER BY queued_at ASC",
    )
    .bind(STATUS_PENDING)
    .fetch_all(pool)
    .await
}
