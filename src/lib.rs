//! Job postings data access on PostgreSQL.
//!
//! [`jobs::JobRepository`] maps the flat `jobs` table to [`jobs::Job`] values,
//! with optional company population and consistent paginated listing.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod jobs;
pub mod telemetry;

pub use error::JobError;
