//! Prediction record operations
//!
//! The `predictions` table is append-only in this core: records are written
//! once by the audit writer and read back scoped by `user_email`. There is
//! no update or delete path.

use riskwatch_common::db::models::PredictionRecord;
use riskwatch_common::{Error, Result};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Append one audit record
pub async fn insert(pool: &SqlitePool, record: &PredictionRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO predictions (
            id, user_email, prediction_type, result, accuracy,
            input_data, blockchain_hash, country, timestamp
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.id.to_string())
    .bind(&record.user_email)
    .bind(&record.prediction_type)
    .bind(&record.result)
    .bind(&record.accuracy)
    .bind(record.input_data.to_string())
    .bind(&record.blockchain_hash)
    .bind(&record.country)
    .bind(record.timestamp.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// All records owned by an email, in store order
///
/// Callers sort by timestamp themselves; store-level ordering is not relied
/// upon.
pub async fn list_for_email(pool: &SqlitePool, email: &str) -> Result<Vec<PredictionRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_email, prediction_type, result, accuracy,
               input_data, blockchain_hash, country, timestamp
        FROM predictions
        WHERE user_email = ?
        "#,
    )
    .bind(email)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(parse_row).collect()
}

fn parse_row(row: sqlx::sqlite::SqliteRow) -> Result<PredictionRecord> {
    let id_str: String = row.get("id");
    let id = Uuid::parse_str(&id_str)
        .map_err(|e| Error::Corrupt(format!("record id: {}", e)))?;

    let input_data: String = row.get("input_data");
    let input_data = serde_json::from_str(&input_data)
        .map_err(|e| Error::Corrupt(format!("record input_data: {}", e)))?;

    let timestamp: String = row.get("timestamp");
    let timestamp = chrono::DateTime::parse_from_rfc3339(&timestamp)
        .map_err(|e| Error::Corrupt(format!("record timestamp: {}", e)))?
        .with_timezone(&chrono::Utc);

    Ok(PredictionRecord {
        id,
        user_email: row.get("user_email"),
        prediction_type: row.get("prediction_type"),
        result: row.get("result"),
        accuracy: row.get("accuracy"),
        input_data,
        blockchain_hash: row.get("blockchain_hash"),
        country: row.get("country"),
        timestamp,
    })
}
