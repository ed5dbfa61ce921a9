//! Prediction history for the signed-in user
//!
//! Records are fetched scoped by the session's email, sorted newest-first
//! in process (store ordering is not relied upon), and the summary counts
//! are recomputed from each stored label - a previously displayed tier is
//! never trusted.

use axum::{extract::State, Extension, Json};
use riskwatch_common::classify::{classify, RiskTier};
use riskwatch_common::db::models::PredictionRecord;
use serde::Serialize;

use crate::api::auth::CurrentUser;
use crate::api::{ApiError, RiskView};
use crate::{db, AppState};

/// One history entry: the stored record plus its freshly recomputed tier
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub record: PredictionRecord,
    pub risk: RiskView,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub total: usize,
    pub detected: usize,
    pub normal: usize,
    pub records: Vec<HistoryEntry>,
}

/// GET /api/history
pub async fn get_history(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let user = user.ok_or(ApiError::Unauthorized)?;

    let mut records = db::predictions::list_for_email(&state.db, &user.email)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let entries: Vec<HistoryEntry> = records
        .into_iter()
        .map(|record| {
            let tier = classify(&record.result);
            HistoryEntry {
                record,
                risk: RiskView::from(tier),
            }
        })
        .collect();

    let total = entries.len();
    let detected = entries
        .iter()
        .filter(|e| classify(&e.record.result) == RiskTier::Detected)
        .count();

    Ok(Json(HistoryResponse {
        total,
        detected,
        normal: total - detected,
        records: entries,
    }))
}
