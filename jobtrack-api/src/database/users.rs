use crate::database::AsyncDbConnection;
use anyhow::Result;
use rand::distributions::Alphanumeric;
use rand::Rng;
use rusqlite::{params, OptionalExtension};

const API_TOKEN_LENGTH: usize = 40;

/// Account a bearer token resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub api_token: String,
    /// Demo accounts may browse but never write
    pub is_test_user: bool,
    pub created_at: i64,
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        api_token: row.get(3)?,
        is_test_user: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn generate_api_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(API_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

pub async fn create_user(
    conn: AsyncDbConnection,
    name: &str,
    email: &str,
    is_test_user: bool,
) -> Result<User> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let user = conn.query_row(
        "INSERT INTO users (name, email, api_token, is_test_user, created_at)
         VALUES (?, ?, ?, ?, ?)
         RETURNING id, name, email, api_token, is_test_user, created_at",
        params![name, email, generate_api_token(), is_test_user, now],
        user_from_row,
    )?;

    Ok(user)
}

pub async fn find_user_by_email(conn: AsyncDbConnection, email: &str) -> Result<Option<User>> {
    let conn = conn.lock().await?;

    let user = conn
        .query_row(
            "SELECT id, name, email, api_token, is_test_user, created_at
             FROM users WHERE email = ?",
            [email],
            user_from_row,
        )
        .optional()?;

    Ok(user)
}

pub async fn find_user_by_token(conn: AsyncDbConnection, token: &str) -> Result<Option<User>> {
    let conn = conn.lock().await?;

    let user = conn
        .query_row(
            "SELECT id, name, email, api_token, is_test_user, created_at
             FROM users WHERE api_token = ?",
            [token],
            user_from_row,
        )
        .optional()?;

    Ok(user)
}

pub async fn get_or_create_user(
    conn: AsyncDbConnection,
    name: &str,
    email: &str,
    is_test_user: bool,
) -> Result<User> {
    if let Some(user) = find_user_by_email(conn.clone(), email).await? {
        return Ok(user);
    }

    create_user(conn, name, email, is_test_user).await
}
