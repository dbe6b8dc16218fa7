use crate::storage::{FieldMatch, JobFilter, JobStore, Window};
use anyhow::Result;
use shared_types::{JobSort, JobStatus, JobType, JobsResponse, ListJobsQuery};
use std::sync::Arc;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Sentinel the frontend sends for "no constraint" on status and job type
const ALL: &str = "all";

/// Validated listing parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobQuery {
    pub search: Option<String>,
    pub status: Option<FieldMatch<JobStatus>>,
    pub job_type: Option<FieldMatch<JobType>>,
    pub sort: JobSort,
    pub page: u64,
    pub limit: u64,
}

impl Default for JobQuery {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            job_type: None,
            sort: JobSort::default(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Absent, empty and `"all"` all mean no constraint
fn constraint(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != ALL)
}

/// Whole number, written as an integer or an integral float such as `2.0`
/// or `1e1`
fn whole_number(value: &str) -> Option<u64> {
    let value = value.trim();
    value.parse::<u64>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.fract() == 0.0 && *v >= 0.0 && *v <= u64::MAX as f64)
            .map(|v| v as u64)
    })
}

/// Positive whole number or `default`; anything else falls back silently
fn positive_or(value: Option<&str>, default: u64) -> u64 {
    value
        .and_then(whole_number)
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

impl From<&ListJobsQuery> for JobQuery {
    fn from(query: &ListJobsQuery) -> Self {
        Self {
            search: query.search.clone().filter(|s| !s.is_empty()),
            status: constraint(query.status.as_deref()).map(FieldMatch::parse),
            job_type: constraint(query.job_type.as_deref()).map(FieldMatch::parse),
            sort: JobSort::from_param(query.sort.as_deref()),
            page: positive_or(query.page.as_deref(), DEFAULT_PAGE),
            limit: positive_or(query.limit.as_deref(), DEFAULT_LIMIT),
        }
    }
}

impl JobQuery {
    pub fn filter_for(&self, owner: i64) -> JobFilter {
        JobFilter {
            owner,
            search: self.search.clone(),
            status: self.status.clone(),
            job_type: self.job_type.clone(),
        }
    }

    pub fn window(&self) -> Window {
        Window {
            skip: self.page.saturating_sub(1).saturating_mul(self.limit),
            limit: self.limit,
        }
    }
}

/// `ceil(total / limit)`; zero matches means zero pages
pub fn page_count(total: u64, limit: u64) -> u64 {
    total.div_ceil(limit.max(1))
}

pub struct JobListing {
    store: Arc<dyn JobStore>,
}

impl JobListing {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    /// One page of `owner`'s jobs plus the unwindowed match count.
    /// Store failures propagate unchanged.
    pub async fn list_jobs(&self, owner: i64, query: &JobQuery) -> Result<JobsResponse> {
        let filter = query.filter_for(owner);
        let window = query.window();

        let (jobs, total_jobs) = futures::try_join!(
            self.store.find(&filter, query.sort, window),
            self.store.count(&filter),
        )?;

        let num_of_pages = page_count(total_jobs, query.limit);

        tracing::debug!(
            owner,
            ?query,
            returned = jobs.len(),
            total_jobs,
            num_of_pages,
            "Listed jobs"
        );

        Ok(JobsResponse {
            jobs,
            total_jobs,
            num_of_pages,
        })
    }
}
