use sqlx::{Pool, Postgres, QueryBuilder};
use tracing::{debug, info};

use crate::error::Result;
use super::model::{Job, JobPage, JobRow, JobUpdate, NewJob, Relation};
use super::populate::{self, PopulateJob};
use super::query::{JobQueryPlan, ListJobsParams, JOB_COLUMNS};
use super::salary;

/// Repository for job postings.
///
/// Owns the mapping between `jobs` rows and [`Job`] values. Holds no state
/// besides the shared pool, so one instance can serve concurrent callers.
#[derive(Clone)]
pub struct JobRepository {
    pool: Pool<Postgres>,
}

impl JobRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a new job and return it as stored, with store defaults applied
    pub async fn create(&self, job: &NewJob) -> Result<Job> {
        debug!("Creating job: title={}", job.title);

        let columns = salary::encode(&job.salary);
        let mut qb = QueryBuilder::<Postgres>::new(
            "INSERT INTO jobs AS j (title, description, salary_currency, salary_period, \
             salary_min_value, salary_max_value) VALUES (",
        );
        let mut values = qb.separated(", ");
        values.push_bind(job.title.clone());
        values.push_bind(job.description.clone());
        values.push_bind(columns.salary_currency);
        values.push_bind(columns.salary_period);
        values.push_bind(columns.salary_min_value);
        values.push_bind(columns.salary_max_value);
        values.push_unseparated(")");
        qb.push(" RETURNING ").push(JOB_COLUMNS);

        let row = qb.build_query_as::<JobRow>().fetch_one(&self.pool).await?;
        let job = Job::from_row(row, Relation::NotRequested)?;

        info!("Job created with id={}", job.id());
        Ok(job)
    }

    /// Look a job up by primary key. `None` when no row matches.
    pub async fn find_by_id(&self, id: i32, populate: &PopulateJob) -> Result<Option<Job>> {
        debug!("Finding job: id={}, populate={:?}", id, populate);

        let plan = JobQueryPlan::select(populate).by_id(id);
        let row = plan
            .build()
            .build_query_as::<JobRow>()
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| Self::to_job(row, populate)).transpose()
    }

    /// List one page of jobs together with the filtered total.
    ///
    /// Both reads run in one repeatable-read transaction, so the count and
    /// the page always describe the same snapshot.
    pub async fn list(&self, params: &ListJobsParams) -> Result<JobPage> {
        debug!("Listing jobs: {:?}", params);

        let plan = JobQueryPlan::select(&params.populate)
            .with_filters(&params.filters)
            .paginate(&params.pagination);

        // Dropping the transaction on any early return rolls it back
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let rows = plan
            .build()
            .build_query_as::<JobRow>()
            .fetch_all(&mut *tx)
            .await?;
        let total_count = plan
            .build_count()
            .build_query_scalar::<i64>()
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        let jobs = rows
            .into_iter()
            .map(|row| Self::to_job(row, &params.populate))
            .collect::<Result<Vec<_>>>()?;

        debug!("Listed {} of {} jobs", jobs.len(), total_count);
        Ok(JobPage { jobs, total_count })
    }

    /// Change title and/or description. Always refreshes `updated_at`.
    ///
    /// `None` when no row matches the id.
    pub async fn update(&self, id: i32, changes: &JobUpdate) -> Result<Option<Job>> {
        debug!("Updating job: id={}, changes={:?}", id, changes);

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE jobs AS j SET updated_at = now()");
        if let Some(title) = &changes.title {
            qb.push(", title = ").push_bind(title.clone());
        }
        if let Some(description) = &changes.description {
            qb.push(", description = ").push_bind(description.clone());
        }
        qb.push(" WHERE j.id = ").push_bind(id);
        qb.push(" RETURNING ").push(JOB_COLUMNS);

        let row = qb
            .build_query_as::<JobRow>()
            .fetch_optional(&self.pool)
            .await?;

        let job = row
            .map(|row| Job::from_row(row, Relation::NotRequested))
            .transpose()?;
        if job.is_some() {
            info!("Job {} updated", id);
        }
        Ok(job)
    }

    /// Hard-delete a job. Returns whether a row was removed; a missing id is not an error.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        debug!("Deleting job: id={}", id);

        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Job {} deleted", id);
        }
        Ok(deleted)
    }

    fn to_job(mut row: JobRow, populate: &PopulateJob) -> Result<Job> {
        let company = populate::company(&mut row, populate);
        Job::from_row(row, company)
    }
}
