use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use sqlx::{Pool, Postgres};
use tracing::info;

use crate::db::migrations;
use crate::jobs::{
    EmploymentType, JobFilters, JobRepository, JobUpdate, ListJobsParams, NewJob, Pagination,
    PopulateJob, Salary, SalaryPeriod, SalaryRange,
};

#[derive(Parser, Debug)]
#[command(name = "job-board", version, about = "Manage job postings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply pending schema migrations
    Migrate,
    /// List jobs, ordered by id
    List {
        /// Only jobs without an end date
        #[arg(long)]
        permanent: bool,
        #[arg(long)]
        with_company: bool,
        #[arg(long, default_value_t = 0)]
        offset: u32,
        /// Omit for no limit
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show a single job
    Get {
        id: i32,
        #[arg(long)]
        with_company: bool,
    },
    /// Create a job
    Create(CreateArgs),
    /// Change the title and/or description of a job
    Update {
        id: i32,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a job
    Delete { id: i32 },
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub currency: Option<String>,
    /// yearly, monthly, weekly, daily or hourly
    #[arg(long, value_parser = parse_period)]
    pub period: Option<SalaryPeriod>,
    #[arg(long)]
    pub min: Option<i64>,
    #[arg(long)]
    pub max: Option<i64>,
}

fn parse_period(s: &str) -> Result<SalaryPeriod, String> {
    s.parse().map_err(|e: crate::jobs::salary::SalaryDecodeError| e.to_string())
}

impl From<CreateArgs> for NewJob {
    fn from(args: CreateArgs) -> Self {
        NewJob {
            title: args.title,
            description: args.description,
            salary: Salary {
                currency: args.currency,
                period: args.period,
                value: SalaryRange {
                    min: args.min,
                    max: args.max,
                },
            },
        }
    }
}

/// What a command produced
#[derive(Debug)]
pub enum Outcome {
    Done,
    Found(serde_json::Value),
    Missing(String),
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(value)?)
}

/// Execute a parsed command against the database
pub async fn run(pool: Pool<Postgres>, command: Command) -> Result<Outcome, Box<dyn std::error::Error>> {
    let repository = JobRepository::new(pool.clone());

    let outcome = match command {
        Command::Migrate => {
            migrations::run_migrations(&pool).await?;
            Outcome::Done
        }
        Command::List {
            permanent,
            with_company,
            offset,
            limit,
        } => {
            let params = ListJobsParams {
                filters: JobFilters {
                    employment_type: permanent.then_some(EmploymentType::Permanent),
                },
                populate: PopulateJob {
                    company: with_company,
                },
                pagination: Pagination { offset, limit },
            };
            let page = repository.list(&params).await?;
            info!("Listed {} jobs (total {})", page.jobs.len(), page.total_count);
            Outcome::Found(to_json(&page)?)
        }
        Command::Get { id, with_company } => {
            let populate = PopulateJob {
                company: with_company,
            };
            match repository.find_by_id(id, &populate).await? {
                Some(job) => Outcome::Found(to_json(&job)?),
                None => Outcome::Missing(format!("Job with id {} not found", id)),
            }
        }
        Command::Create(args) => {
            let job = repository.create(&NewJob::from(args)).await?;
            Outcome::Found(to_json(&job)?)
        }
        Command::Update {
            id,
            title,
            description,
        } => match repository.update(id, &JobUpdate { title, description }).await? {
            Some(job) => Outcome::Found(to_json(&job)?),
            None => Outcome::Missing(format!("Job with id {} not found", id)),
        },
        Command::Delete { id } => {
            if !repository.delete(id).await? {
                info!("Job {} did not exist, nothing deleted", id);
            }
            Outcome::Done
        }
    };

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_without_limit() {
        let cli = Cli::try_parse_from(["job-board", "list", "--permanent", "--offset", "10"]).unwrap();

        match cli.command {
            Command::List {
                permanent,
                with_company,
                offset,
                limit,
            } => {
                assert!(permanent);
                assert!(!with_company);
                assert_eq!(offset, 10);
                assert_eq!(limit, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn create_args_become_nested_salary() {
        let cli = Cli::try_parse_from([
            "job-board",
            "create",
            "--title",
            "Engineer",
            "--description",
            "Build things",
            "--currency",
            "USD",
            "--period",
            "yearly",
            "--min",
            "80000",
        ])
        .unwrap();

        let Command::Create(args) = cli.command else {
            panic!("expected create command");
        };
        let job = NewJob::from(args);

        assert_eq!(job.salary.currency.as_deref(), Some("USD"));
        assert_eq!(job.salary.period, Some(SalaryPeriod::Yearly));
        assert_eq!(job.salary.value, SalaryRange { min: Some(80_000), max: None });
    }

    #[test]
    fn rejects_unknown_period() {
        let result = Cli::try_parse_from([
            "job-board",
            "create",
            "--title",
            "t",
            "--description",
            "d",
            "--period",
            "fortnightly",
        ]);

        assert!(result.is_err());
    }
}
