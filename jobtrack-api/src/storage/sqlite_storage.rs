use super::{JobFilter, JobStore, MonthBucket, StatusGroup, Window};
use crate::database::{jobs as db, AsyncDbConnection};
use async_trait::async_trait;
use shared_types::{Job, JobSort};

pub struct SqliteJobStore {
    conn: AsyncDbConnection,
}

impl SqliteJobStore {
    pub fn new(conn: AsyncDbConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl JobStore for SqliteJobStore {
    async fn find(
        &self,
        filter: &JobFilter,
        sort: JobSort,
        window: Window,
    ) -> anyhow::Result<Vec<Job>> {
        db::find_jobs(self.conn.clone(), filter, sort, window).await
    }

    async fn count(&self, filter: &JobFilter) -> anyhow::Result<u64> {
        db::count_jobs(self.conn.clone(), filter).await
    }

    async fn count_by_status(&self, owner: i64) -> anyhow::Result<Vec<StatusGroup>> {
        db::count_jobs_by_status(self.conn.clone(), owner).await
    }

    async fn count_by_month(&self, owner: i64) -> anyhow::Result<Vec<MonthBucket>> {
        db::count_jobs_by_month(self.conn.clone(), owner).await
    }
}
