//! Local activation audit log — append-only history of activations
//! against this install. No behavior beyond persistence; support tooling
//! reads it when diagnosing licensing disputes.

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

/// One recorded activation.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ActivationLogEntry {
    pub id: String,
    pub serial_number: String,
    pub hardware_id: String,
    pub temporary: bool,
    pub activated_at: DateTime<Utc>,
}

/// Append an entry inside the caller's transaction so the audit row and
/// the counter update commit or roll back together.
pub(crate) async fn append(
    tx: &mut Transaction<'_, Sqlite>,
    serial: &str,
    hardware_id: &str,
    temporary: bool,
    activated_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO local_activations (id, serial_number, hardware_id, temporary, activated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(serial)
    .bind(hardware_id)
    .bind(temporary)
    .bind(activated_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// All entries, oldest first.
pub async fn list(pool: &SqlitePool) -> Result<Vec<ActivationLogEntry>, sqlx::Error> {
    sqlx::query_as::<_, ActivationLogEntry>(
        "SELECT id, serial_number, hardware_id, temporary, activated_at
         FROM local_activations ORDER BY activated_at ASC",
    )
    .fetch_all(pool)
    .await
}
