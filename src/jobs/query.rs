use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};

use super::populate::{PopulateJob, RelationSelect};

/// Base columns of a job, qualified with the `j` alias
pub(crate) const JOB_COLUMNS: &str = "j.id, j.title, j.description, \
     j.salary_currency, j.salary_period, j.salary_min_value, j.salary_max_value, \
     j.location_type, j.created_at, j.updated_at";

/// Employment type filter
///
/// Only `permanent` restricts the result set. Any other value is accepted
/// and imposes no restriction.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    Permanent,
    #[serde(other)]
    Unrestricted,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct JobFilters {
    pub employment_type: Option<EmploymentType>,
}

/// Offset/limit paging. `limit: None` means unbounded, not zero rows.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Pagination {
    pub offset: u32,
    pub limit: Option<u32>,
}

/// Parameters of a listing call
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ListJobsParams {
    pub filters: JobFilters,
    pub populate: PopulateJob,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Predicate {
    IdEquals(i32),
    NoEndDate,
}

/// Description of a single `SELECT` over `jobs AS j`.
///
/// Assembled once per call from typed parameters and rendered into a
/// parameterised [`QueryBuilder`].
pub struct JobQueryPlan {
    relations: Vec<&'static RelationSelect>,
    predicates: Vec<Predicate>,
    ordered: bool,
    offset: Option<u32>,
    limit: Option<u32>,
}

impl JobQueryPlan {
    pub fn select(populate: &PopulateJob) -> Self {
        JobQueryPlan {
            relations: populate.relations(),
            predicates: Vec::new(),
            ordered: false,
            offset: None,
            limit: None,
        }
    }

    pub fn by_id(mut self, id: i32) -> Self {
        self.predicates.push(Predicate::IdEquals(id));
        self
    }

    pub fn with_filters(mut self, filters: &JobFilters) -> Self {
        if let Some(EmploymentType::Permanent) = filters.employment_type {
            self.predicates.push(Predicate::NoEndDate);
        }
        self
    }

    /// Apply paging; paged results are always ordered by id ascending
    pub fn paginate(mut self, pagination: &Pagination) -> Self {
        self.ordered = true;
        self.offset = Some(pagination.offset);
        self.limit = pagination.limit;
        self
    }

    /// Render the row query
    pub fn build(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(JOB_COLUMNS);
        for relation in &self.relations {
            qb.push(", ").push(relation.sql).push(" AS ").push(relation.alias);
        }
        qb.push(" FROM jobs AS j");
        self.push_predicates(&mut qb);

        if self.ordered {
            qb.push(" ORDER BY j.id ASC");
        }
        if let Some(limit) = self.limit {
            qb.push(" LIMIT ").push_bind(i64::from(limit));
        }
        if let Some(offset) = self.offset {
            qb.push(" OFFSET ").push_bind(i64::from(offset));
        }
        qb
    }

    /// Render a count over the same predicates, ignoring relations and paging
    pub fn build_count(&self) -> QueryBuilder<'static, Postgres> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM jobs AS j");
        self.push_predicates(&mut qb);
        qb
    }

    fn push_predicates(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        for (i, predicate) in self.predicates.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            match *predicate {
                Predicate::IdEquals(id) => {
                    qb.push("j.id = ").push_bind(id);
                }
                Predicate::NoEndDate => {
                    qb.push("j.end_date IS NULL");
                }
            }
        }
    }
}
