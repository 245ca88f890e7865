//! Transaction counter persistence — the singleton activation row.
//!
//! All reads and writes target the single row with `id = 1`. The
//! increment is a guarded `UPDATE ... RETURNING`, so the trial-limit
//! check and the increment are one atomic statement with no lost-update
//! window under concurrent requests.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use tillgate_core::LicenseStatus;

use crate::activations;

/// The singleton counter row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterRecord {
    pub total_transactions: u32,
    pub license_status: LicenseStatus,
    pub serial_number: Option<String>,
    pub hardware_id: Option<String>,
    pub activation_date: Option<DateTime<Utc>>,
    pub last_validation: Option<DateTime<Utc>>,
    pub temporary_until: Option<DateTime<Utc>>,
}

impl CounterRecord {
    /// Whether a grace-period grant is currently valid.
    pub fn in_grace_period(&self, now: DateTime<Utc>) -> bool {
        self.temporary_until.is_some_and(|until| until > now)
    }
}

const COUNTER_COLUMNS: &str = "total_transactions, license_status, serial_number, hardware_id,
     activation_date, last_validation, temporary_until";

/// Read the singleton row.
pub async fn read(pool: &SqlitePool) -> Result<CounterRecord, sqlx::Error> {
    let row = sqlx::query_as::<_, CounterRow>(&format!(
        "SELECT {COUNTER_COLUMNS} FROM transaction_counter WHERE id = 1"
    ))
    .fetch_one(pool)
    .await?;
    Ok(row.into_record())
}

/// Atomically increment the counter if permitted, returning the
/// post-increment row, or `None` when the quota is exhausted.
///
/// The guard allows the increment when the license is activated, when a
/// grace-period grant is still valid, or when the trial counter is under
/// `trial_limit`. An expired grace period falls back to the trial quota.
pub async fn increment(
    pool: &SqlitePool,
    trial_limit: u32,
    now: DateTime<Utc>,
) -> Result<Option<CounterRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, CounterRow>(&format!(
        "UPDATE transaction_counter
         SET total_transactions = total_transactions + 1
         WHERE id = 1
           AND (license_status = 'activated'
                OR (temporary_until IS NOT NULL AND temporary_until > ?2)
                OR total_transactions < ?1)
         RETURNING {COUNTER_COLUMNS}"
    ))
    .bind(i64::from(trial_limit))
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(CounterRow::into_record))
}

/// Persist a determined activation outcome and append an audit entry in
/// one transaction — no partial state on failure.
///
/// Confirmed grants (`temporary_until = None`) flip the status to
/// `activated`. Grace grants keep the status at `trial`; unlimited use
/// during the window comes from `temporary_until` alone, so expiry
/// fails closed back to the trial quota.
pub async fn record_activation(
    pool: &SqlitePool,
    serial: &str,
    hardware_id: &str,
    temporary_until: Option<DateTime<Utc>>,
) -> Result<(), sqlx::Error> {
    let now = Utc::now();
    let status = if temporary_until.is_some() {
        LicenseStatus::Trial
    } else {
        LicenseStatus::Activated
    };

    let mut tx = pool.begin().await?;
    sqlx::query(
        "UPDATE transaction_counter
         SET license_status = ?1, serial_number = ?2, hardware_id = ?3,
             activation_date = ?4, last_validation = ?5, temporary_until = ?6
         WHERE id = 1",
    )
    .bind(status.as_str())
    .bind(serial)
    .bind(hardware_id)
    .bind(now)
    .bind(now)
    .bind(temporary_until)
    .execute(&mut *tx)
    .await?;

    activations::append(&mut tx, serial, hardware_id, temporary_until.is_some(), now).await?;
    tx.commit().await?;
    Ok(())
}

/// Restore fresh trial state.
pub async fn reset(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE transaction_counter
         SET total_transactions = 0, license_status = 'trial', serial_number = NULL,
             hardware_id = NULL, activation_date = NULL, last_validation = NULL,
             temporary_until = NULL
         WHERE id = 1",
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct CounterRow {
    total_transactions: i64,
    license_status: String,
    serial_number: Option<String>,
    hardware_id: Option<String>,
    activation_date: Option<DateTime<Utc>>,
    last_validation: Option<DateTime<Utc>>,
    temporary_until: Option<DateTime<Utc>>,
}

impl CounterRow {
    fn into_record(self) -> CounterRecord {
        CounterRecord {
            total_transactions: u32::try_from(self.total_transactions).unwrap_or_else(|_| {
                tracing::error!(
                    total_transactions = self.total_transactions,
                    "negative transaction counter in database — defaulting to 0; \
                     this indicates corruption or a schema mismatch"
                );
                0
            }),
            license_status: LicenseStatus::from_str_opt(&self.license_status).unwrap_or_else(|| {
                tracing::error!(
                    license_status = %self.license_status,
                    "unknown license_status in database — treating as trial"
                );
                LicenseStatus::Trial
            }),
            serial_number: self.serial_number,
            hardware_id: self.hardware_id,
            activation_date: self.activation_date,
            last_validation: self.last_validation,
            temporary_until: self.temporary_until,
        }
    }
}
