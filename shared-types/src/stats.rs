use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Per-status counts for one owner, zero-filled for statuses with no records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatusCounts {
    pub pending: u64,
    pub interview: u64,
    pub declined: u64,
}

impl StatusCounts {
    pub fn total(&self) -> u64 {
        self.pending + self.interview + self.declined
    }
}

/// Number of applications created in one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlyApplication {
    /// Label such as "Mar 2024"
    pub date: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct JobStatsResponse {
    pub default_stats: StatusCounts,
    /// Most recent month first, at most six entries
    pub monthly_applications: Vec<MonthlyApplication>,
}
