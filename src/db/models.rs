use serde::Serialize;
use sqlx::FromRow;

/// Database representation of a job with all stored fields
///
/// `length_of_stay` is not a column; it is recomputed from the two
/// stored dates when the row is turned back into an entity.
#[derive(Debug, FromRow, Serialize)]
pub struct JobRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub arrival_date: i64,
    pub departure_date: i64,
    pub location: i64,
    pub last_notified: f64,
}
