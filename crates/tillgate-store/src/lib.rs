//! # tillgate-store — Durable License State
//!
//! SQLite-backed persistence for the licensing subsystem. This crate is
//! the only place activation data is written; every other component
//! treats [`LicenseStore`] as the single source of truth and never
//! caches license status across calls.
//!
//! ## Tables
//!
//! | Table                 | Module          | Contents                           |
//! |-----------------------|-----------------|------------------------------------|
//! | `transaction_counter` | [`counter`]     | Singleton row (id = 1): trial usage + activation state |
//! | `preloaded_serials`   | [`preloaded`]   | Known-good serials for offline recognition |
//! | `validation_queue`    | [`queue`]       | Offline-accepted serials awaiting server reconciliation |
//! | `local_activations`   | [`activations`] | Append-only audit log of activations |
//!
//! ## Concurrency
//!
//! The counter row is the unit of concurrency. The increment path is a
//! single guarded `UPDATE ... RETURNING` — a compare-and-swap in SQL —
//! so there is no read-compute-write window, and the trial quota holds
//! across concurrent requests and across processes sharing the file.
//!
//! Schema creation is idempotent and runs on every [`LicenseStore::connect`].

pub mod activations;
pub mod counter;
pub mod preloaded;
pub mod queue;
mod schema;

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

pub use activations::ActivationLogEntry;
pub use counter::CounterRecord;
pub use preloaded::PreloadedSerial;
pub use queue::QueueEntry;

/// Handle to the embedded license database.
///
/// Cheap to clone; all clones share the underlying pool.
#[derive(Debug, Clone)]
pub struct LicenseStore {
    pool: SqlitePool,
}

impl LicenseStore {
    /// Open (creating if missing) the database at `url` and run the
    /// idempotent schema bootstrap.
    ///
    /// `url` is a SQLite connection string, e.g. `sqlite://tillgate.db`.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        schema::init(&pool).await?;
        Ok(Self { pool })
    }

    /// Open an in-memory database (single connection — SQLite in-memory
    /// databases are per-connection). Used by tests and ephemeral setups.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        schema::init(&pool).await?;
        Ok(Self { pool })
    }

    /// Access the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ── Counter operations ──────────────────────────────────────────

    /// Read the singleton counter row.
    pub async fn read_counter(&self) -> Result<CounterRecord, sqlx::Error> {
        counter::read(&self.pool).await
    }

    /// Atomically increment the transaction counter if permitted.
    ///
    /// Returns the post-increment row, or `None` when the trial quota is
    /// exhausted (counter unchanged).
    pub async fn increment(&self, trial_limit: u32) -> Result<Option<CounterRecord>, sqlx::Error> {
        counter::increment(&self.pool, trial_limit, Utc::now()).await
    }

    /// Persist a determined activation outcome and append an audit entry.
    ///
    /// `temporary_until = None` records a confirmed activation;
    /// `Some(expiry)` records an offline grace grant.
    pub async fn record_activation(
        &self,
        serial: &str,
        hardware_id: &str,
        temporary_until: Option<DateTime<Utc>>,
    ) -> Result<(), sqlx::Error> {
        counter::record_activation(&self.pool, serial, hardware_id, temporary_until).await
    }

    /// Restore fresh trial state: counter 0, all activation fields cleared.
    pub async fn reset(&self) -> Result<(), sqlx::Error> {
        counter::reset(&self.pool).await
    }

    // ── Preloaded serial operations ─────────────────────────────────

    /// Look up a serial in the offline reference table.
    pub async fn lookup_preloaded(
        &self,
        serial: &str,
    ) -> Result<Option<PreloadedSerial>, sqlx::Error> {
        preloaded::lookup(&self.pool, serial).await
    }

    /// Insert or replace a preloaded serial (seeding / support tooling).
    pub async fn seed_preloaded(&self, entry: &PreloadedSerial) -> Result<(), sqlx::Error> {
        preloaded::upsert(&self.pool, entry).await
    }

    // ── Validation queue operations ─────────────────────────────────

    /// Upsert a pending reconciliation entry for `serial`.
    pub async fn enqueue_validation(
        &self,
        serial: &str,
        hardware_id: &str,
    ) -> Result<(), sqlx::Error> {
        queue::enqueue(&self.pool, serial, hardware_id).await
    }

    /// Entries awaiting reconciliation, oldest first. This is the drain
    /// contract for the (external) background re-validation worker.
    pub async fn pending_validations(&self) -> Result<Vec<QueueEntry>, sqlx::Error> {
        queue::pending(&self.pool).await
    }

    // ── Audit log ───────────────────────────────────────────────────

    /// All recorded activations against this install, oldest first.
    pub async fn activation_log(&self) -> Result<Vec<ActivationLogEntry>, sqlx::Error> {
        activations::list(&self.pool).await
    }
}
