pub mod sqlite_storage;

pub use sqlite_storage::SqliteJobStore;

use anyhow::Result;
use async_trait::async_trait;
use shared_types::{Job, JobSort, JobStatus, JobType};
use std::fmt;
use std::str::FromStr;

/// Exact-match constraint on an enumerated column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldMatch<T> {
    Is(T),
    /// Text outside the enumeration; no stored record carries it
    Unrecognized(String),
}

impl<T: FromStr> FieldMatch<T> {
    pub fn parse(raw: &str) -> Self {
        raw.parse()
            .map(FieldMatch::Is)
            .unwrap_or_else(|_| FieldMatch::Unrecognized(raw.to_string()))
    }
}

impl<T: fmt::Display> FieldMatch<T> {
    /// Text compared against the stored column
    pub fn column_text(&self) -> String {
        match self {
            FieldMatch::Is(value) => value.to_string(),
            FieldMatch::Unrecognized(raw) => raw.clone(),
        }
    }
}

/// AND-combined predicate over one owner's job records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFilter {
    pub owner: i64,
    /// Case-insensitive substring of `position`
    pub search: Option<String>,
    pub status: Option<FieldMatch<JobStatus>>,
    pub job_type: Option<FieldMatch<JobType>>,
}

impl JobFilter {
    pub fn for_owner(owner: i64) -> Self {
        Self {
            owner,
            search: None,
            status: None,
            job_type: None,
        }
    }
}

/// Skip/limit slice applied after filtering and sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub skip: u64,
    pub limit: u64,
}

/// Record count for one raw `status` value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusGroup {
    pub status: String,
    pub count: u64,
}

/// Record count for one calendar month of `created_at` (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    pub count: u64,
}

/// Query capability the listing engine and stats aggregator run against.
///
/// Implementations must honour `JobFilter::owner` on every call; nothing above
/// this trait re-checks ownership.
#[async_trait]
pub trait JobStore: Send + Sync {
    async fn find(&self, filter: &JobFilter, sort: JobSort, window: Window) -> Result<Vec<Job>>;
    async fn count(&self, filter: &JobFilter) -> Result<u64>;

    /// Groups keep the stored status text as-is so callers decide what to
    /// do with values outside `JobStatus`.
    async fn count_by_status(&self, owner: i64) -> Result<Vec<StatusGroup>>;
    async fn count_by_month(&self, owner: i64) -> Result<Vec<MonthBucket>>;
}
