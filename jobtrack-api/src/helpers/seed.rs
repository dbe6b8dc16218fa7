use anyhow::{Context, Result};
use shared_types::CreateJobRequest;
use std::path::Path;

use crate::database::{jobs, AsyncDbConnection};

/// Load a JSON array of jobs from `path` into `owner`'s collection. Records
/// may carry their own `createdAt` so the stats have history to show.
pub async fn seed_jobs(conn: AsyncDbConnection, owner: i64, path: &Path) -> Result<usize> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;

    let records: Vec<CreateJobRequest> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of jobs", path.display()))?;

    for (index, record) in records.iter().enumerate() {
        if let Some(created_at) = record.created_at {
            jobs::check_created_at(created_at)
                .with_context(|| format!("Seed record {} in {}", index, path.display()))?;
        }
    }

    for record in &records {
        jobs::insert_job(conn.clone(), owner, record).await?;
    }

    tracing::info!("Seeded {} jobs for owner {}", records.len(), owner);
    Ok(records.len())
}
