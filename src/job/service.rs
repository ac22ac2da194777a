use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::models::Job;
use crate::config::Config;
use crate::db::models::JobRow;
use crate::db::SqliteHelper;
use crate::error::ServiceError;

/// How long after a notification a job stays out of [`JobCrudService::get_jobs`]
pub const NOTIFICATION_COOLDOWN: Duration = Duration::from_secs(15 * 60);

/// Job CRUD service containing all SQL knowledge
///
/// Translates job operations into statements against the database
/// helper and rebuilds entities from the returned rows. The database
/// path is resolved at construction and fixed for the service's
/// lifetime; nothing is cached between calls.
pub struct JobCrudService {
    db: SqliteHelper,
    db_path: String,
}

impl JobCrudService {
    /// Create a service against the configured database path
    pub async fn from_config(config: &Config) -> Result<Self, ServiceError> {
        Self::with_database_path(&config.database_path).await
    }

    /// Create a service against an explicit database file
    ///
    /// Used by tests to point the service at a scratch database.
    pub async fn with_database_path(path: &str) -> Result<Self, ServiceError> {
        let db = SqliteHelper::open(path).await.map_err(ServiceError::Storage)?;

        Ok(Self {
            db,
            db_path: path.to_string(),
        })
    }

    /// The database file this service reads and writes
    pub fn database_path(&self) -> &str {
        &self.db_path
    }

    /// Fetch all jobs not notified within the cooldown window
    ///
    /// Jobs whose `last_notified` falls inside [`NOTIFICATION_COOLDOWN`]
    /// are excluded; never-notified jobs (timestamp 0) always qualify.
    /// Rows come back in insertion order.
    pub async fn get_jobs(&self) -> Result<Vec<Job>, ServiceError> {
        let cutoff = epoch_now() - NOTIFICATION_COOLDOWN.as_secs_f64();
        debug!("Fetching jobs last notified before {}", cutoff);

        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, name, email, phone, arrival_date, departure_date, location, last_notified
            FROM jobs
            WHERE last_notified < ?
            "#,
        )
        .bind(cutoff)
        .fetch_all(self.db.pool())
        .await
        .map_err(ServiceError::Storage)?;

        rows.into_iter().map(Job::from_row).collect()
    }

    /// Fetch the single job with the given id
    ///
    /// # Returns
    /// - `Ok(Some(job))` - the stored job
    /// - `Ok(None)` - no row matches the id
    /// - `Err(ServiceError::Validation)` - more than one row matches;
    ///   id uniqueness has been violated in the store
    pub async fn get_job_by_id(&self, id: &Uuid) -> Result<Option<Job>, ServiceError> {
        let mut rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT id, name, email, phone, arrival_date, departure_date, location, last_notified
            FROM jobs
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_all(self.db.pool())
        .await
        .map_err(ServiceError::Storage)?;

        match rows.len() {
            0 => Ok(None),
            1 => Job::from_row(rows.remove(0)).map(Some),
            n => Err(ServiceError::Validation(format!(
                "Expected at most one job with id {}, found {}",
                id, n
            ))),
        }
    }

    /// Insert a new row for the job, id included
    ///
    /// A duplicate id or any other constraint failure surfaces as
    /// `ServiceError::Storage`.
    pub async fn write_job(&self, job: &Job) -> Result<(), ServiceError> {
        info!("Writing job id={} name={}", job.id, job.name);

        sqlx::query(
            r#"
            INSERT INTO jobs (id, name, email, phone, arrival_date, departure_date, location, last_notified)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(job.id.to_string())
        .bind(&job.name)
        .bind(&job.email)
        .bind(&job.phone)
        .bind(job.arrival_date)
        .bind(job.departure_date)
        .bind(job.location)
        .bind(job.last_notified)
        .execute(self.db.pool())
        .await
        .map_err(ServiceError::Storage)?;

        Ok(())
    }

    /// Stamp the stored row's `last_notified` with the current time
    ///
    /// Writes the clock's value, not the job's in-memory one. Fails with
    /// `ServiceError::NotFound` when no stored row matches the job's id.
    pub async fn update_job_last_notified(&self, job: &Job) -> Result<(), ServiceError> {
        let now = epoch_now();
        debug!("Marking job {} notified at {}", job.id, now);

        let result = sqlx::query("UPDATE jobs SET last_notified = ? WHERE id = ?")
            .bind(now)
            .bind(job.id.to_string())
            .execute(self.db.pool())
            .await
            .map_err(ServiceError::Storage)?;

        if result.rows_affected() == 0 {
            warn!("No stored job with id {}", job.id);
            return Err(ServiceError::NotFound(job.id.to_string()));
        }

        Ok(())
    }
}

/// Current time as fractional epoch seconds
fn epoch_now() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
