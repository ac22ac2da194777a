use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Error, Pool, Sqlite,
};

/// Open a SQLite connection pool for the given database file
///
/// # Parameters
/// - `database_path`: path to the database file; created if missing
///
/// # Returns
/// A pool capped at a single connection. The store expects one writer at
/// a time; a single connection serializes every statement issued through
/// this pool.
pub async fn get_connection(database_path: &str) -> Result<Pool<Sqlite>, Error> {
    let options = SqliteConnectOptions::new()
        .filename(database_path)
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
}
