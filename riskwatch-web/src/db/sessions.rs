//! Login session operations
//!
//! One row per issued cookie token. Sessions are looked up on every request
//! by the session middleware and deleted on logout.

use chrono::Utc;
use riskwatch_common::db::models::{SessionUser, User};
use riskwatch_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Create a session for a freshly authenticated user, returning the token
pub async fn create_session(pool: &SqlitePool, user: &User) -> Result<String> {
    let token = Uuid::new_v4().to_string();

    sqlx::query("INSERT INTO sessions (token, user_id, email, created_at) VALUES (?, ?, ?, ?)")
        .bind(&token)
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await?;

    Ok(token)
}

/// Resolve a cookie token to its user, if the session exists
pub async fn lookup(pool: &SqlitePool, token: &str) -> Result<Option<SessionUser>> {
    let row = sqlx::query("SELECT user_id, email FROM sessions WHERE token = ?")
        .bind(token)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let user_id_str: String = row.get("user_id");
            let user_id = Uuid::parse_str(&user_id_str)
                .map_err(|e| Error::Corrupt(format!("session user id: {}", e)))?;

            Ok(Some(SessionUser {
                user_id,
                email: row.get("email"),
            }))
        }
        None => Ok(None),
    }
}

/// Delete a session; a non-existent token is not an error
pub async fn delete_session(pool: &SqlitePool, token: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;

    Ok(())
}
