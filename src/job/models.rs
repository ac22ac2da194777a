use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::db::models::JobRow;
use crate::error::ServiceError;

const SECONDS_PER_DAY: i64 = 86_400;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Incoming job fields as supplied by a caller
///
/// Dates are human-readable `YYYY-MM-DD` strings; they are converted to
/// epoch seconds when the draft is turned into a [`Job`].
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct JobDraft {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,

    #[validate(email(message = "Email must be a valid address"))]
    pub email: String,

    #[validate(length(
        min = 7,
        max = 20,
        message = "Phone must be between 7 and 20 characters"
    ))]
    pub phone: String,

    pub arrival_date: String,
    pub departure_date: String,
    pub location: i64,

    #[serde(default)]
    pub id: Option<Uuid>,

    #[serde(default)]
    pub last_notified: Option<f64>,
}

/// One guest reservation with its notification state
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Midnight UTC of the arrival day, in epoch seconds
    pub arrival_date: i64,
    /// Midnight UTC of the departure day, in epoch seconds
    pub departure_date: i64,
    /// Site id, references the sites table
    pub location: i64,
    /// Whole days between arrival and departure
    pub length_of_stay: i64,
    /// Epoch seconds of the last notification, 0 when never notified
    pub last_notified: f64,
}

impl Job {
    /// Build a job from caller-supplied fields
    ///
    /// Generates a fresh id unless the draft carries one. Fails with
    /// `ServiceError::Validation` on a malformed date, an arrival after
    /// the departure, or a field rejected by the draft's validators.
    pub fn new(draft: JobDraft) -> Result<Self, ServiceError> {
        draft
            .validate()
            .map_err(|e| ServiceError::Validation(flatten_validation_errors(&e)))?;

        let arrival = parse_date(&draft.arrival_date)?;
        let departure = parse_date(&draft.departure_date)?;

        if arrival > departure {
            return Err(ServiceError::Validation(format!(
                "Arrival date {} is after departure date {}",
                draft.arrival_date, draft.departure_date
            )));
        }

        Ok(Job {
            id: draft.id.unwrap_or_else(Uuid::new_v4),
            name: draft.name,
            email: draft.email,
            phone: draft.phone,
            arrival_date: epoch_seconds(arrival),
            departure_date: epoch_seconds(departure),
            location: draft.location,
            length_of_stay: (departure - arrival).num_days(),
            last_notified: draft.last_notified.unwrap_or(0.0),
        })
    }

    /// Overwrite the last-notified timestamp with the given epoch seconds
    pub fn set_last_notified(&mut self, timestamp: f64) {
        self.last_notified = timestamp;
    }

    /// Rebuild a job from its stored row, preserving the stored id
    pub(crate) fn from_row(row: JobRow) -> Result<Self, ServiceError> {
        let id = Uuid::parse_str(&row.id).map_err(|e| {
            ServiceError::Validation(format!("Stored job id {:?} is not a UUID: {}", row.id, e))
        })?;

        Ok(Job {
            id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            arrival_date: row.arrival_date,
            departure_date: row.departure_date,
            location: row.location,
            length_of_stay: (row.departure_date - row.arrival_date) / SECONDS_PER_DAY,
            last_notified: row.last_notified,
        })
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| {
        ServiceError::Validation(format!("Date {:?} is not in YYYY-MM-DD format", value))
    })
}

fn epoch_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

fn flatten_validation_errors(errors: &validator::ValidationErrors) -> String {
    let messages: Vec<String> = errors
        .field_errors()
        .values()
        .flat_map(|errors| {
            errors.iter().map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation error".to_string())
            })
        })
        .collect();

    messages.join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> JobDraft {
        JobDraft {
            name: "Spang".to_string(),
            email: "Jane.Doe@gmail.com".to_string(),
            phone: "4086212997".to_string(),
            arrival_date: "2020-05-10".to_string(),
            departure_date: "2020-05-12".to_string(),
            location: 0,
            id: None,
            last_notified: None,
        }
    }

    #[test]
    fn converts_dates_and_computes_length_of_stay() {
        let job = Job::new(draft()).unwrap();

        // 2020-05-10T00:00:00Z and 2020-05-12T00:00:00Z
        assert_eq!(job.arrival_date, 1_589_068_800);
        assert_eq!(job.departure_date, 1_589_241_600);
        assert_eq!(job.length_of_stay, 2);
    }

    #[test]
    fn allows_a_same_day_departure() {
        let mut d = draft();
        d.departure_date = "2020-05-10".to_string();

        let job = Job::new(d).unwrap();
        assert_eq!(job.length_of_stay, 0);
    }

    #[test]
    fn generates_an_id_when_none_is_supplied() {
        let a = Job::new(draft()).unwrap();
        let b = Job::new(draft()).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn keeps_an_explicit_id() {
        let id = Uuid::new_v4();
        let mut d = draft();
        d.id = Some(id);

        assert_eq!(Job::new(d).unwrap().id, id);
    }

    #[test]
    fn rejects_a_malformed_date() {
        let mut d = draft();
        d.arrival_date = "05/10/2020".to_string();

        assert!(matches!(Job::new(d), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn rejects_arrival_after_departure() {
        let mut d = draft();
        d.arrival_date = "2020-05-13".to_string();

        assert!(matches!(Job::new(d), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn rejects_an_invalid_email() {
        let mut d = draft();
        d.email = "not-an-email".to_string();

        assert!(matches!(Job::new(d), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn last_notified_defaults_to_never() {
        let job = Job::new(draft()).unwrap();
        assert_eq!(job.last_notified, 0.0);
    }

    #[test]
    fn set_last_notified_overwrites_the_timestamp() {
        let mut job = Job::new(draft()).unwrap();
        job.set_last_notified(1_589_000_000.5);

        assert_eq!(job.last_notified, 1_589_000_000.5);
    }

    #[test]
    fn rebuilds_from_a_stored_row() {
        let id = Uuid::new_v4();
        let row = JobRow {
            id: id.to_string(),
            name: "Spang".to_string(),
            email: "Jane.Doe@gmail.com".to_string(),
            phone: "4086212997".to_string(),
            arrival_date: 1_589_068_800,
            departure_date: 1_589_241_600,
            location: 0,
            last_notified: 42.5,
        };

        let job = Job::from_row(row).unwrap();
        assert_eq!(job.id, id);
        assert_eq!(job.length_of_stay, 2);
        assert_eq!(job.last_notified, 42.5);
    }

    #[test]
    fn rejects_a_stored_row_with_a_bad_id() {
        let row = JobRow {
            id: "not-a-uuid".to_string(),
            name: "Spang".to_string(),
            email: "Jane.Doe@gmail.com".to_string(),
            phone: "4086212997".to_string(),
            arrival_date: 1_589_068_800,
            departure_date: 1_589_241_600,
            location: 0,
            last_notified: 0.0,
        };

        assert!(matches!(
            Job::from_row(row),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn deserializes_a_draft_from_a_json_mapping() {
        let draft: JobDraft = serde_json::from_value(serde_json::json!({
            "name": "Spang",
            "email": "Jane.Doe@gmail.com",
            "phone": "4086212997",
            "arrival_date": "2020-05-10",
            "departure_date": "2020-05-12",
            "location": 0
        }))
        .unwrap();

        assert!(draft.id.is_none());
        assert!(draft.last_notified.is_none());
    }
}
