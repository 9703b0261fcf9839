//! User Repository

use sqlx::SqlitePool;

use shared::models::{User, UserCreate};
use shared::util::now_millis;

use super::{RepoError, RepoResult};

const COLUMNS: &str = "id, username, first_name, last_name, email, role, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("SELECT {COLUMNS} FROM users WHERE id = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let sql = format!("SELECT {COLUMNS} FROM users WHERE username = ?");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// First admin on file - the fallback operator attribution when a request
/// carries no explicit creator.
pub async fn find_default_admin(pool: &SqlitePool) -> RepoResult<Option<User>> {
    let sql = format!("SELECT {COLUMNS} FROM users WHERE role = 'admin' ORDER BY id LIMIT 1");
    let user = sqlx::query_as::<_, User>(&sql).fetch_optional(pool).await?;
    Ok(user)
}

pub async fn create(pool: &SqlitePool, data: UserCreate) -> RepoResult<User> {
    if find_by_username(pool, &data.username).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Username {} already exists",
            data.username
        )));
    }

    let now = now_millis();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO users (username, first_name, last_name, email, role, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&data.username)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.email)
    .bind(&data.role)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}
