//! Login/signup analytics events
//!
//! Written best-effort from the auth handlers; callers log and discard any
//! error from here.

use chrono::Utc;
use riskwatch_common::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Record one auth action (`"login"` or `"signup"`)
pub async fn record_event(pool: &SqlitePool, email: &str, action: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO analytics_events (id, user_email, action, timestamp) VALUES (?, ?, ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(email)
    .bind(action)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}
