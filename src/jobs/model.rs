use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};
use sqlx::types::Json;
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::{JobError, Result};
use super::salary::{self, Salary, SalaryColumns};

/// Where the work happens
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    #[default]
    Onsite,
    Remote,
    Hybrid,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Onsite => "onsite",
            LocationType::Remote => "remote",
            LocationType::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "onsite" => Ok(LocationType::Onsite),
            "remote" => Ok(LocationType::Remote),
            "hybrid" => Ok(LocationType::Hybrid),
            other => Err(format!("unknown location type '{}'", other)),
        }
    }
}

/// Company summary attached to a job on request
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct CompanyRef {
    pub id: i32,
    pub name: String,
}

/// An optional related entity.
///
/// `NotRequested` is left out of serialized output entirely, while
/// `Loaded(None)` serializes as `null` (requested, but the job has none).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Relation<T> {
    #[default]
    NotRequested,
    Loaded(Option<T>),
}

impl<T> Relation<T> {
    pub fn is_not_requested(&self) -> bool {
        matches!(self, Relation::NotRequested)
    }

    /// The related value, if it was requested and exists
    pub fn get(&self) -> Option<&T> {
        match self {
            Relation::Loaded(value) => value.as_ref(),
            Relation::NotRequested => None,
        }
    }
}

impl<T: Serialize> Serialize for Relation<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Relation::Loaded(Some(value)) => value.serialize(serializer),
            Relation::Loaded(None) | Relation::NotRequested => serializer.serialize_none(),
        }
    }
}

/// Raw `jobs` row as returned by the store.
///
/// Columns are nullable here so that a malformed row is reported as a
/// data-integrity error instead of a decode failure.
#[derive(Debug, FromRow)]
pub struct JobRow {
    pub id: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[sqlx(flatten)]
    pub salary: SalaryColumns,
    pub location_type: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    /// Only selected when the company relation is populated
    #[sqlx(default)]
    pub company: Option<Json<CompanyRef>>,
}

/// A job posting. Read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    id: i32,
    title: String,
    description: String,
    salary: Salary,
    location_type: LocationType,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Relation::is_not_requested")]
    company: Relation<CompanyRef>,
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T> {
    value.ok_or_else(|| {
        warn!("Rejecting job row: required field '{}' is missing", field);
        JobError::integrity(field, "required value is missing")
    })
}

impl Job {
    /// Build a job from a fully shaped row and its resolved company relation
    pub(crate) fn from_row(row: JobRow, company: Relation<CompanyRef>) -> Result<Self> {
        let id = required(row.id, "id")?;
        let title = required(row.title, "title")?;
        let description = required(row.description, "description")?;
        let location_type = required(row.location_type, "location_type")?
            .parse::<LocationType>()
            .map_err(|reason| JobError::integrity("location_type", reason))?;
        let created_at = required(row.created_at, "created_at")?;
        let updated_at = required(row.updated_at, "updated_at")?;
        let salary = salary::decode(row.salary)
            .map_err(|e| JobError::integrity("salary_period", e.to_string()))?;

        Ok(Job {
            id,
            title,
            description,
            salary,
            location_type,
            created_at,
            updated_at,
            company,
        })
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn salary(&self) -> &Salary {
        &self.salary
    }

    pub fn location_type(&self) -> LocationType {
        self.location_type
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    pub fn company(&self) -> &Relation<CompanyRef> {
        &self.company
    }
}

/// Input for creating a job
#[derive(Debug, Deserialize, Clone)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub salary: Salary,
}

/// Partial update of the mutable job fields
#[derive(Debug, Deserialize, Clone, Default)]
pub struct JobUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// One page of jobs plus the size of the filtered universe
#[derive(Debug, Serialize)]
pub struct JobPage {
    pub jobs: Vec<Job>,
    #[serde(rename = "totalCount")]
    pub total_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::salary::SalaryPeriod;
    use chrono::NaiveDate;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn full_row() -> JobRow {
        JobRow {
            id: Some(7),
            title: Some("Engineer".to_string()),
            description: Some("Build things".to_string()),
            salary: SalaryColumns {
                salary_currency: Some("USD".to_string()),
                salary_period: Some("yearly".to_string()),
                salary_min_value: Some(80_000),
                salary_max_value: Some(120_000),
            },
            location_type: Some("remote".to_string()),
            created_at: Some(timestamp()),
            updated_at: Some(timestamp()),
            company: None,
        }
    }

    #[test]
    fn builds_job_from_complete_row() {
        let job = Job::from_row(full_row(), Relation::NotRequested).unwrap();

        assert_eq!(job.id(), 7);
        assert_eq!(job.title(), "Engineer");
        assert_eq!(job.location_type(), LocationType::Remote);
        assert_eq!(job.salary().period, Some(SalaryPeriod::Yearly));
        assert_eq!(job.salary().value.max, Some(120_000));
        assert!(job.company().is_not_requested());
    }

    #[test]
    fn rejects_row_without_title() {
        let row = JobRow {
            title: None,
            ..full_row()
        };

        match Job::from_row(row, Relation::NotRequested) {
            Err(JobError::DataIntegrity { field, .. }) => assert_eq!(field, "title"),
            other => panic!("expected data integrity error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_row_without_id_or_description() {
        let no_id = JobRow { id: None, ..full_row() };
        let no_description = JobRow {
            description: None,
            ..full_row()
        };

        assert!(matches!(
            Job::from_row(no_id, Relation::NotRequested),
            Err(JobError::DataIntegrity { field: "id", .. })
        ));
        assert!(matches!(
            Job::from_row(no_description, Relation::NotRequested),
            Err(JobError::DataIntegrity { field: "description", .. })
        ));
    }

    #[test]
    fn rejects_unknown_location_type() {
        let row = JobRow {
            location_type: Some("moon".to_string()),
            ..full_row()
        };

        assert!(matches!(
            Job::from_row(row, Relation::NotRequested),
            Err(JobError::DataIntegrity { field: "location_type", .. })
        ));
    }

    #[test]
    fn company_is_omitted_unless_requested() {
        let job = Job::from_row(full_row(), Relation::NotRequested).unwrap();
        let json = serde_json::to_value(&job).unwrap();
        assert!(json.get("company").is_none());

        let job = Job::from_row(full_row(), Relation::Loaded(None)).unwrap();
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["company"], serde_json::Value::Null);

        let acme = CompanyRef {
            id: 3,
            name: "Acme".to_string(),
        };
        let job = Job::from_row(full_row(), Relation::Loaded(Some(acme))).unwrap();
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["company"], serde_json::json!({"id": 3, "name": "Acme"}));
    }

    #[test]
    fn serializes_nested_salary() {
        let job = Job::from_row(full_row(), Relation::NotRequested).unwrap();
        let json = serde_json::to_value(&job).unwrap();

        assert_eq!(
            json["salary"],
            serde_json::json!({
                "currency": "USD",
                "period": "yearly",
                "value": { "min": 80000, "max": 120000 }
            })
        );
    }
}
