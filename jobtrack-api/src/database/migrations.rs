use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    // Create users table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR NOT NULL,
            email VARCHAR NOT NULL UNIQUE,
            api_token VARCHAR NOT NULL UNIQUE,
            is_test_user BOOLEAN NOT NULL DEFAULT false,
            created_at BIGINT NOT NULL
        )",
        [],
    )?;

    // Create jobs table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS jobs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner_id INTEGER NOT NULL,
            position VARCHAR NOT NULL,
            company VARCHAR NOT NULL,
            status VARCHAR NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'interview', 'declined')),
            job_type VARCHAR NOT NULL DEFAULT 'full-time' CHECK (job_type IN ('full-time', 'part-time', 'remote', 'internship')),
            job_location VARCHAR NOT NULL DEFAULT 'my city',
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL,
            FOREIGN KEY (owner_id) REFERENCES users (id) ON DELETE CASCADE
        )",
        [],
    )?;

    // Every listing and aggregate is scoped by owner
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_jobs_owner_created
            ON jobs(owner_id, created_at)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_jobs_owner_status
            ON jobs(owner_id, status)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_jobs_owner_position
            ON jobs(owner_id, position COLLATE NOCASE)",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'jobs')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 2);
    }

    #[test]
    fn test_status_check_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn.execute(
            "INSERT INTO users (name, email, api_token, created_at) VALUES ('a', 'a@example.com', 't', 0)",
            [],
        )
        .unwrap();

        let result = conn.execute(
            "INSERT INTO jobs (owner_id, position, company, status, created_at, updated_at)
                VALUES (1, 'Engineer', 'Acme', 'ghosted', 0, 0)",
            [],
        );
        assert!(result.is_err());
    }
}
