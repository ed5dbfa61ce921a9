//! Audit record writer
//!
//! Composes the immutable prediction record (geolocation, verification
//! token, deep-copied input) and appends it to the `predictions` table.
//! Best-effort: the writer runs in a spawned task that the submission
//! response does not wait for, and an insert failure is logged without
//! retry - the user has already seen the prediction by then.
//!
//! The attributed identity is whatever email was captured at submit time;
//! a sign-out while the write is in flight does not re-attribute the record.

use chrono::Utc;
use riskwatch_common::db::models::PredictionRecord;
use riskwatch_common::domains::PredictionDomain;
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::{debug, error};
use uuid::Uuid;

use crate::db;
use crate::services::geoip;
use crate::services::inference::NormalizedResult;

/// Everything the writer needs, captured at submit time
pub struct AuditContext {
    pub db: SqlitePool,
    pub http: reqwest::Client,
    pub geoip_url: String,
}

/// Spawn the audit write for one submission
///
/// Returns immediately; the record lands (or fails silently) later.
pub fn spawn_record(
    ctx: AuditContext,
    domain: PredictionDomain,
    user_email: String,
    input_data: Value,
    normalized: NormalizedResult,
    token: String,
) {
    tokio::spawn(async move {
        write_record(ctx, domain, user_email, input_data, normalized, token).await;
    });
}

async fn write_record(
    ctx: AuditContext,
    domain: PredictionDomain,
    user_email: String,
    input_data: Value,
    normalized: NormalizedResult,
    token: String,
) {
    let country = geoip::lookup_country(&ctx.http, &ctx.geoip_url).await;

    let record = PredictionRecord {
        id: Uuid::new_v4(),
        user_email,
        prediction_type: domain.slug().to_string(),
        result: normalized.predicted_label,
        accuracy: normalized.confidence_display,
        input_data,
        blockchain_hash: token,
        country,
        timestamp: Utc::now(),
    };

    match db::predictions::insert(&ctx.db, &record).await {
        Ok(()) => debug!(
            id = %record.id,
            domain = %record.prediction_type,
            "Prediction record persisted"
        ),
        // Silent degradation: the prediction outcome was already shown
        Err(e) => error!("Failed to persist prediction record: {}", e),
    }
}
