use crate::storage::{JobStore, MonthBucket, StatusGroup};
use anyhow::Result;
use chrono::NaiveDate;
use shared_types::{JobStatsResponse, JobStatus, MonthlyApplication, StatusCounts};
use std::sync::Arc;

/// Number of calendar months reported in the trend
pub const TREND_MONTHS: usize = 6;

/// Fold raw status groups into the fixed three-key summary. Groups whose key
/// is not a known status are dropped.
pub fn normalize_status_counts(groups: &[StatusGroup]) -> StatusCounts {
    let mut counts = StatusCounts::default();

    for group in groups {
        match group.status.parse::<JobStatus>() {
            Ok(JobStatus::Pending) => counts.pending += group.count,
            Ok(JobStatus::Interview) => counts.interview += group.count,
            Ok(JobStatus::Declined) => counts.declined += group.count,
            Err(e) => tracing::debug!("Dropping status group from summary: {}", e),
        }
    }

    counts
}

/// "Mar 2024" style label, `None` for an impossible month
fn month_label(year: i32, month: u32) -> Option<String> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|date| date.format("%b %Y").to_string())
}

/// Most recent months first, truncated to [`TREND_MONTHS`]. Months without
/// applications are not padded in.
pub fn monthly_trend(mut buckets: Vec<MonthBucket>) -> Vec<MonthlyApplication> {
    buckets.sort_by(|a, b| (b.year, b.month).cmp(&(a.year, a.month)));
    buckets.truncate(TREND_MONTHS);

    buckets
        .into_iter()
        .filter_map(|bucket| {
            let label = month_label(bucket.year, bucket.month);
            if label.is_none() {
                tracing::warn!("Skipping invalid month bucket {}-{}", bucket.year, bucket.month);
            }
            label.map(|date| MonthlyApplication {
                date,
                count: bucket.count,
            })
        })
        .collect()
}

pub struct StatsAggregator {
    store: Arc<dyn JobStore>,
}

impl StatsAggregator {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store }
    }

    pub async fn stats(&self, owner: i64) -> Result<JobStatsResponse> {
        let (groups, buckets) = futures::try_join!(
            self.store.count_by_status(owner),
            self.store.count_by_month(owner),
        )?;

        let default_stats = normalize_status_counts(&groups);
        let monthly_applications = monthly_trend(buckets);

        tracing::debug!(
            owner,
            total = default_stats.total(),
            months = monthly_applications.len(),
            "Computed job stats"
        );

        Ok(JobStatsResponse {
            default_stats,
            monthly_applications,
        })
    }
}
