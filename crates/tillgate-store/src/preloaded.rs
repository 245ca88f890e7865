//! Preloaded serial reference table — offline recognition of known-good
//! serials without network access. Shipped with the installer and
//! refreshed by support tooling; this module only reads and seeds it.

use chrono::NaiveDate;
use sqlx::SqlitePool;

/// A serial known to the offline reference table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct PreloadedSerial {
    pub serial_number: String,
    pub valid: bool,
    pub max_installations: i64,
    pub license_type: String,
    pub generated_date: Option<NaiveDate>,
}

/// Look up a serial. `None` when the table does not know it.
pub async fn lookup(
    pool: &SqlitePool,
    serial: &str,
) -> Result<Option<PreloadedSerial>, sqlx::Error> {
    sqlx::query_as::<_, PreloadedSerial>(
        "SELECT serial_number, valid, max_installations, license_type, generated_date
         FROM preloaded_serials WHERE serial_number = ?1",
    )
    .bind(serial)
    .fetch_optional(pool)
    .await
}

/// Insert or replace an entry.
pub async fn upsert(pool: &SqlitePool, entry: &PreloadedSerial) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO preloaded_serials (serial_number, valid, max_installations, license_type, generated_date)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(serial_number) DO UPDATE SET
             valid = excluded.valid,
             max_installations = excluded.max_installations,
             license_type = excluded.license_type,
             generated_date = excluded.generated_date",
    )
    .bind(&entry.serial_number)
    .bind(entry.valid)
    .bind(entry.max_installations)
    .bind(&entry.license_type)
    .bind(entry.generated_date)
    .execute(pool)
    .await?;
    Ok(())
}
