//! Database operations for the `users` table.

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tenderdb_core::UserSeed;
use uuid::Uuid;

use crate::DbError;

/// A row from the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Look up a user by username.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_user_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<UserRow>, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT id, username, email, role, is_active, created_at, updated_at \
         FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Insert a user or refresh the existing row with the same username.
///
/// Returns the user's id.
pub(crate) async fn upsert_user(conn: &mut PgConnection, user: &UserSeed) -> Result<Uuid, DbError> {
    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (username, email, role, is_active) \
         VALUES ($1, $2, $3, true) \
         ON CONFLICT (username) DO UPDATE SET \
             email = EXCLUDED.email, \
             role = EXCLUDED.role, \
             updated_at = NOW() \
         RETURNING id",
    )
    .bind(user.username)
    .bind(user.email)
    .bind(user.role.to_string())
    .fetch_one(conn)
    .await?;
    Ok(id)
}
