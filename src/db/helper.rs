use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Sqlite};
use tracing::debug;

use crate::db::connection;

/// Thin wrapper over the SQLite pool
///
/// Single choke-point for executing statements against the database
/// file. Every write is committed as soon as its statement completes;
/// no multi-statement transaction is held open.
pub struct SqliteHelper {
    pool: Pool<Sqlite>,
}

impl SqliteHelper {
    /// Open the database file at `path`, creating it if missing
    pub async fn open(path: &str) -> Result<Self, sqlx::Error> {
        let pool = connection::get_connection(path).await?;
        Ok(Self { pool })
    }

    /// The underlying pool, for callers that bind parameters themselves
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Execute one statement and return the number of affected rows
    ///
    /// Failures surfaced by the store (malformed SQL, constraint
    /// violations) propagate to the caller untouched.
    pub async fn execute(&self, statement: &str) -> Result<u64, sqlx::Error> {
        debug!("Executing statement: {}", statement);

        let result = sqlx::query(statement).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Execute one statement and fetch all resulting rows, in store order
    pub async fn fetch_all(&self, statement: &str) -> Result<Vec<SqliteRow>, sqlx::Error> {
        debug!("Fetching rows: {}", statement);

        sqlx::query(statement).fetch_all(&self.pool).await
    }

    /// Run a multi-statement SQL script, one statement at a time
    ///
    /// Splits on `;` and skips empty fragments. Used to apply the schema
    /// files under migrations/.
    pub async fn run_script(&self, script: &str) -> Result<(), sqlx::Error> {
        for statement in script.split(';') {
            let statement = statement.trim();
            if statement.is_empty() {
                continue;
            }
            self.execute(statement).await?;
        }
        Ok(())
    }
}
