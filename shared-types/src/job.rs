use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

/// Error returned when a status or job type string is outside its enumeration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobFieldError {
    #[error("Unknown job status: {0}")]
    UnknownStatus(String),

    #[error("Unknown job type: {0}")]
    UnknownJobType(String),
}

/// Application status of a job record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum JobStatus {
    #[default]
    Pending,
    Interview,
    Declined,
}

impl JobStatus {
    pub const ALL: [JobStatus; 3] = [JobStatus::Pending, JobStatus::Interview, JobStatus::Declined];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Interview => "interview",
            JobStatus::Declined => "declined",
        }
    }
}

impl FromStr for JobStatus {
    type Err = JobFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(JobStatus::Pending),
            "interview" => Ok(JobStatus::Interview),
            "declined" => Ok(JobStatus::Declined),
            other => Err(JobFieldError::UnknownStatus(other.to_string())),
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Employment type of a job record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Remote,
    Internship,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full-time",
            JobType::PartTime => "part-time",
            JobType::Remote => "remote",
            JobType::Internship => "internship",
        }
    }
}

impl FromStr for JobType {
    type Err = JobFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full-time" => Ok(JobType::FullTime),
            "part-time" => Ok(JobType::PartTime),
            "remote" => Ok(JobType::Remote),
            "internship" => Ok(JobType::Internship),
            other => Err(JobFieldError::UnknownJobType(other.to_string())),
        }
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordering applied to a job listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum JobSort {
    /// Most recently created first
    Latest,
    /// Oldest first
    Oldest,
    /// Position ascending
    #[serde(rename = "a-z")]
    AToZ,
    /// Position descending
    #[default]
    ZToA,
}

impl JobSort {
    /// Maps the `sort` query parameter onto a sort policy. Unrecognized or
    /// missing values fall back to position descending.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("latest") => JobSort::Latest,
            Some("oldest") => JobSort::Oldest,
            Some("a-z") => JobSort::AToZ,
            _ => JobSort::ZToA,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub owner: i64,
    pub position: String,
    pub company: String,
    pub status: JobStatus,
    pub job_type: JobType,
    pub job_location: String,
    pub created_at: i64,
    pub updated_at: i64,
}

fn default_job_location() -> String {
    "my city".to_string()
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub position: String,
    pub company: String,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub job_type: JobType,
    #[serde(default = "default_job_location")]
    pub job_location: String,
    /// Only honoured by the seed loader; the API always stamps the current time
    #[serde(default)]
    #[ts(skip)]
    pub created_at: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobRequest {
    pub position: Option<String>,
    pub company: Option<String>,
    pub status: Option<JobStatus>,
    pub job_type: Option<JobType>,
    pub job_location: Option<String>,
}

/// Raw query string of `GET /api/jobs`.
///
/// Every field is kept as a string so malformed values never fail extraction;
/// page and limit are coerced to defaults later on.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ListJobsQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub job_type: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct JobsResponse {
    pub jobs: Vec<Job>,
    pub total_jobs: u64,
    pub num_of_pages: u64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct JobResponse {
    pub job: Job,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_type_serialization() {
        let json = serde_json::to_string(&JobType::FullTime).unwrap();
        assert_eq!(json, "\"full-time\"");

        let parsed: JobType = serde_json::from_str("\"part-time\"").unwrap();
        assert_eq!(parsed, JobType::PartTime);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("interview".parse::<JobStatus>(), Ok(JobStatus::Interview));
        assert_eq!(
            "all".parse::<JobStatus>(),
            Err(JobFieldError::UnknownStatus("all".to_string()))
        );
        for status in JobStatus::ALL {
            assert_eq!(status.as_str().parse::<JobStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_sort_from_param() {
        assert_eq!(JobSort::from_param(Some("latest")), JobSort::Latest);
        assert_eq!(JobSort::from_param(Some("oldest")), JobSort::Oldest);
        assert_eq!(JobSort::from_param(Some("a-z")), JobSort::AToZ);
        assert_eq!(JobSort::from_param(Some("z-a")), JobSort::ZToA);
        assert_eq!(JobSort::from_param(Some("LATEST")), JobSort::ZToA);
        assert_eq!(JobSort::from_param(None), JobSort::ZToA);
    }

    #[test]
    fn test_create_request_defaults() {
        let request: CreateJobRequest =
            serde_json::from_str(r#"{"position":"Backend Engineer","company":"Acme"}"#).unwrap();

        assert_eq!(request.status, JobStatus::Pending);
        assert_eq!(request.job_type, JobType::FullTime);
        assert_eq!(request.job_location, "my city");
        assert!(request.created_at.is_none());
    }

    #[test]
    fn test_job_serializes_camel_case() {
        let job = Job {
            id: 7,
            owner: 1,
            position: "Analyst".to_string(),
            company: "Initech".to_string(),
            status: JobStatus::Declined,
            job_type: JobType::Remote,
            job_location: "Austin".to_string(),
            created_at: 1_700_000_000,
            updated_at: 1_700_000_000,
        };

        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["jobType"], "remote");
        assert_eq!(value["jobLocation"], "Austin");
        assert_eq!(value["createdAt"], 1_700_000_000);
    }
}
