use serde::{Deserialize, Serialize};

pub mod job;
pub mod stats;

pub use job::{
    CreateJobRequest, Job, JobFieldError, JobResponse, JobSort, JobStatus, JobType,
    JobsResponse, ListJobsQuery, UpdateJobRequest,
};
pub use stats::{JobStatsResponse, MonthlyApplication, StatusCounts};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
