//! Shared record models

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A local user account row
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub salt: String,
    pub created_at: DateTime<Utc>,
}

/// The identity attached to a request by the session middleware
///
/// Read-only view of the signed-in user; only the session layer writes it.
#[derive(Debug, Clone, Serialize)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub email: String,
}

/// One immutable prediction audit record
///
/// Composed once per successful submission and appended to the
/// `predictions` table; never updated or deleted. `result` stores the
/// predicted label verbatim so the risk tier can always be recomputed.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionRecord {
    pub id: Uuid,
    pub user_email: String,
    pub prediction_type: String,
    pub result: String,
    pub accuracy: String,
    /// Deep copy of the submitted draft (or `{"filename": ...}` for image domains)
    pub input_data: serde_json::Value,
    /// Verification token; independent randomness, not a content hash
    pub blockchain_hash: String,
    pub country: String,
    pub timestamp: DateTime<Utc>,
}
