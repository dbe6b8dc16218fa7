use crate::database::AsyncDbConnection;
use crate::storage::{JobFilter, MonthBucket, StatusGroup, Window};
use anyhow::{bail, Result};
use chrono::Datelike;
use rusqlite::{params, OptionalExtension, ToSql};
use shared_types::{CreateJobRequest, Job, JobFieldError, JobSort, UpdateJobRequest};

const JOB_COLUMNS: &str =
    "id, owner_id, position, company, status, job_type, job_location, created_at, updated_at";

fn conversion_error(column: usize, e: JobFieldError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
}

fn job_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Job> {
    let status: String = row.get(4)?;
    let job_type: String = row.get(5)?;

    Ok(Job {
        id: row.get(0)?,
        owner: row.get(1)?,
        position: row.get(2)?,
        company: row.get(3)?,
        status: status.parse().map_err(|e| conversion_error(4, e))?,
        job_type: job_type.parse().map_err(|e| conversion_error(5, e))?,
        job_location: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

/// Builds the WHERE clause for a filter. The owner condition is always first.
fn filter_clause(filter: &JobFilter) -> (String, Vec<Box<dyn ToSql>>) {
    let mut conditions = vec!["owner_id = ?".to_string()];
    let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(filter.owner)];

    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        // instr keeps % and _ in the search text literal
        conditions.push("instr(lower(position), lower(?)) > 0".to_string());
        params.push(Box::new(search.to_string()));
    }
    if let Some(status) = &filter.status {
        conditions.push("status = ?".to_string());
        params.push(Box::new(status.column_text()));
    }
    if let Some(job_type) = &filter.job_type {
        conditions.push("job_type = ?".to_string());
        params.push(Box::new(job_type.column_text()));
    }

    (conditions.join(" AND "), params)
}

/// Ties on the sort key are broken by id in the same direction
fn order_clause(sort: JobSort) -> &'static str {
    match sort {
        JobSort::Latest => "created_at DESC, id DESC",
        JobSort::Oldest => "created_at ASC, id ASC",
        JobSort::AToZ => "position COLLATE NOCASE ASC, id ASC",
        JobSort::ZToA => "position COLLATE NOCASE DESC, id DESC",
    }
}

/// SQLite's date functions only cover years 0000 through 9999
const MAX_YEAR: i32 = 9999;

/// Reject `created_at` values (unix seconds) that SQLite cannot bucket by
/// month, such as millisecond timestamps.
pub fn check_created_at(created_at: i64) -> Result<()> {
    match chrono::DateTime::from_timestamp(created_at, 0) {
        Some(at) if (0..=MAX_YEAR).contains(&at.year()) => Ok(()),
        _ => bail!(
            "createdAt {} is outside years 0-{}; expected unix seconds",
            created_at,
            MAX_YEAR
        ),
    }
}

fn sql_int(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

pub async fn find_jobs(
    conn: AsyncDbConnection,
    filter: &JobFilter,
    sort: JobSort,
    window: Window,
) -> Result<Vec<Job>> {
    let conn = conn.lock().await?;

    let (where_sql, mut params) = filter_clause(filter);
    params.push(Box::new(sql_int(window.limit)));
    params.push(Box::new(sql_int(window.skip)));

    let query = format!(
        "SELECT {} FROM jobs WHERE {} ORDER BY {} LIMIT ? OFFSET ?",
        JOB_COLUMNS,
        where_sql,
        order_clause(sort)
    );

    let params_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&query)?;
    let jobs = stmt
        .query_map(params_refs.as_slice(), job_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(jobs)
}

pub async fn count_jobs(conn: AsyncDbConnection, filter: &JobFilter) -> Result<u64> {
    let conn = conn.lock().await?;

    let (where_sql, params) = filter_clause(filter);
    let query = format!("SELECT COUNT(*) FROM jobs WHERE {}", where_sql);

    let params_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let count: i64 = conn.query_row(&query, params_refs.as_slice(), |row| row.get(0))?;

    Ok(count as u64)
}

pub async fn count_jobs_by_status(conn: AsyncDbConnection, owner: i64) -> Result<Vec<StatusGroup>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(
        "SELECT status, COUNT(*)
         FROM jobs
         WHERE owner_id = ?
         GROUP BY status",
    )?;

    let groups = stmt
        .query_map([owner], |row| {
            Ok(StatusGroup {
                status: row.get(0)?,
                count: row.get::<_, i64>(1)? as u64,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(groups)
}

pub async fn count_jobs_by_month(conn: AsyncDbConnection, owner: i64) -> Result<Vec<MonthBucket>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(
        "SELECT CAST(strftime('%Y', created_at, 'unixepoch') AS INTEGER) AS year,
                CAST(strftime('%m', created_at, 'unixepoch') AS INTEGER) AS month,
                COUNT(*)
         FROM jobs
         WHERE owner_id = ?
           AND strftime('%Y', created_at, 'unixepoch') IS NOT NULL
         GROUP BY year, month",
    )?;

    let buckets = stmt
        .query_map([owner], |row| {
            Ok(MonthBucket {
                year: row.get(0)?,
                month: row.get(1)?,
                count: row.get::<_, i64>(2)? as u64,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(buckets)
}

/// Insert a job for `owner`. `request.created_at` is used when present so
/// seeded data keeps its history.
pub async fn insert_job(
    conn: AsyncDbConnection,
    owner: i64,
    request: &CreateJobRequest,
) -> Result<Job> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();
    let created_at = request.created_at.unwrap_or(now);
    check_created_at(created_at)?;

    let query = format!(
        "INSERT INTO jobs
         (owner_id, position, company, status, job_type, job_location, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING {}",
        JOB_COLUMNS
    );

    let job = conn.query_row(
        &query,
        params![
            owner,
            &request.position,
            &request.company,
            request.status.as_str(),
            request.job_type.as_str(),
            &request.job_location,
            created_at,
            created_at.max(now),
        ],
        job_from_row,
    )?;

    Ok(job)
}

pub async fn get_job(conn: AsyncDbConnection, owner: i64, id: i64) -> Result<Option<Job>> {
    let conn = conn.lock().await?;

    let query = format!("SELECT {} FROM jobs WHERE id = ? AND owner_id = ?", JOB_COLUMNS);
    let job = conn
        .query_row(&query, params![id, owner], job_from_row)
        .optional()?;

    Ok(job)
}

/// Apply the provided fields; `None` when the job does not exist for `owner`
pub async fn update_job(
    conn: AsyncDbConnection,
    owner: i64,
    id: i64,
    request: &UpdateJobRequest,
) -> Result<Option<Job>> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let mut updates = vec!["updated_at = ?".to_string()];
    let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(now)];

    if let Some(position) = &request.position {
        updates.push("position = ?".to_string());
        params.push(Box::new(position.clone()));
    }
    if let Some(company) = &request.company {
        updates.push("company = ?".to_string());
        params.push(Box::new(company.clone()));
    }
    if let Some(status) = request.status {
        updates.push("status = ?".to_string());
        params.push(Box::new(status.as_str()));
    }
    if let Some(job_type) = request.job_type {
        updates.push("job_type = ?".to_string());
        params.push(Box::new(job_type.as_str()));
    }
    if let Some(job_location) = &request.job_location {
        updates.push("job_location = ?".to_string());
        params.push(Box::new(job_location.clone()));
    }

    params.push(Box::new(id));
    params.push(Box::new(owner));

    let query = format!(
        "UPDATE jobs SET {} WHERE id = ? AND owner_id = ? RETURNING {}",
        updates.join(", "),
        JOB_COLUMNS
    );

    let params_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
    let job = conn
        .query_row(&query, params_refs.as_slice(), job_from_row)
        .optional()?;

    Ok(job)
}

pub async fn delete_job(conn: AsyncDbConnection, owner: i64, id: i64) -> Result<bool> {
    let conn = conn.lock().await?;

    let deleted = conn.execute(
        "DELETE FROM jobs WHERE id = ? AND owner_id = ?",
        params![id, owner],
    )?;

    Ok(deleted > 0)
}
