pub mod model;
pub mod populate;
pub mod query;
pub mod repository;
pub mod salary;

// Re-export commonly used types
pub use model::{CompanyRef, Job, JobPage, JobUpdate, LocationType, NewJob, Relation};
pub use populate::PopulateJob;
pub use query::{EmploymentType, JobFilters, ListJobsParams, Pagination};
pub use repository::JobRepository;
pub use salary::{Salary, SalaryPeriod, SalaryRange};
