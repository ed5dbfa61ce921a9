//! User account operations

use chrono::Utc;
use riskwatch_common::auth::{generate_salt, hash_password};
use riskwatch_common::db::models::User;
use riskwatch_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Create a new user account
///
/// The email is stored as given; uniqueness is enforced case-insensitively
/// by the table's NOCASE collation.
pub async fn create_user(pool: &SqlitePool, email: &str, password: &str) -> Result<User> {
    let salt = generate_salt();
    let user = User {
        id: Uuid::new_v4(),
        email: email.trim().to_string(),
        password_hash: hash_password(password, &salt),
        salt,
        created_at: Utc::now(),
    };

    let result = sqlx::query(
        "INSERT INTO users (id, email, password_hash, salt, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user.id.to_string())
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.salt)
    .bind(user.created_at.to_rfc3339())
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(user),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(Error::Rejected("Email already registered".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Look up a user by email (case-insensitive, per table collation)
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let row = sqlx::query(
        "SELECT id, email, password_hash, salt, created_at FROM users WHERE email = ?",
    )
    .bind(email.trim())
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let id_str: String = row.get("id");
            let id = Uuid::parse_str(&id_str)
                .map_err(|e| Error::Corrupt(format!("user id: {}", e)))?;

            let created_at: String = row.get("created_at");
            let created_at = chrono::DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| Error::Corrupt(format!("user created_at: {}", e)))?
                .with_timezone(&chrono::Utc);

            Ok(Some(User {
                id,
                email: row.get("email"),
                password_hash: row.get("password_hash"),
                salt: row.get("salt"),
                created_at,
            }))
        }
        None => Ok(None),
    }
}
