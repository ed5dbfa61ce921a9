//! Prediction form schema and submission pipeline
//!
//! `GET /api/schema/:domain` serves the field descriptors the form renders
//! from; `POST /api/predict/:domain` runs the submission pipeline:
//! validate the draft against the descriptors, call the inference endpoint,
//! classify the normalized result, generate the verification token, spawn
//! the audit write, and answer with the outcome.
//!
//! The inference call must complete successfully before any result is
//! returned; the audit write is deliberately not awaited, so the response
//! and the persisted record can diverge in time.

use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    Extension, Json,
};
use riskwatch_common::classify;
use riskwatch_common::domains::{FieldKind, PredictionDomain};
use riskwatch_common::token::generate_token;
use serde::Serialize;
use serde_json::{json, Value};

use crate::api::auth::CurrentUser;
use crate::api::{ApiError, RiskView};
use crate::services::audit::{self, AuditContext};
use crate::services::inference::{InferenceClient, InferenceError, NormalizedResult};
use crate::AppState;

/// Upper bound on a JSON draft body
const DRAFT_BODY_LIMIT: usize = 64 * 1024;

/// Outcome of one successful submission
#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    /// Predicted label, verbatim from the normalized response
    pub result: String,
    /// Formatted confidence (`"N/A"` when the endpoint sent none)
    pub accuracy: String,
    pub risk: RiskView,
    /// Verification token also stored on the audit record
    pub token: String,
}

/// GET /api/schema/:domain
pub async fn get_schema(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(slug): Path<String>,
) -> Result<Json<Value>, ApiError> {
    user.ok_or(ApiError::Unauthorized)?;
    let domain = resolve_domain(&slug)?;

    Ok(Json(json!({
        "domain": domain.slug(),
        "title": domain.title(),
        "image": domain.is_image(),
        "fields": domain.descriptors(),
    })))
}

/// POST /api/predict/:domain
///
/// JSON domains take the draft payload as the request body; the image
/// domain takes a multipart body with a single file field.
pub async fn submit(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(slug): Path<String>,
    request: Request,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let user = user.ok_or(ApiError::Unauthorized)?;
    let domain = resolve_domain(&slug)?;

    let client = InferenceClient::new(state.http.clone(), state.config.inference_base_url.clone());

    let (normalized, input_data) = if domain.is_image() {
        let (filename, bytes) = read_upload(request, &state).await?;
        let normalized = client
            .submit_image(domain, &filename, bytes)
            .await
            .map_err(map_inference_error)?;
        (normalized, json!({ "filename": filename }))
    } else {
        let draft = read_draft(request).await?;
        validate_draft(domain, &draft)?;
        let normalized = client
            .submit_json(domain, &draft)
            .await
            .map_err(map_inference_error)?;
        (normalized, draft)
    };

    let token = generate_token();
    let tier = classify::classify(&normalized.predicted_label);

    // Fire-and-forget: the identity captured here is the one attributed to
    // the record, even if the user signs out before the write lands.
    spawn_audit(&state, domain, user.email, input_data, &normalized, &token);

    Ok(Json(SubmissionResponse {
        result: normalized.predicted_label,
        accuracy: normalized.confidence_display,
        risk: RiskView::from(tier),
        token,
    }))
}

fn resolve_domain(slug: &str) -> Result<PredictionDomain, ApiError> {
    PredictionDomain::from_slug(slug)
        .ok_or_else(|| ApiError::NotFound(format!("Unknown prediction domain: {}", slug)))
}

fn map_inference_error(err: InferenceError) -> ApiError {
    ApiError::Upstream(err.to_string())
}

fn spawn_audit(
    state: &AppState,
    domain: PredictionDomain,
    user_email: String,
    input_data: Value,
    normalized: &NormalizedResult,
    token: &str,
) {
    audit::spawn_record(
        AuditContext {
            db: state.db.clone(),
            http: state.http.clone(),
            geoip_url: state.config.geoip_url.clone(),
        },
        domain,
        user_email,
        input_data,
        normalized.clone(),
        token.to_string(),
    );
}

/// Read and parse a JSON draft body
async fn read_draft(request: Request) -> Result<Value, ApiError> {
    let bytes = axum::body::to_bytes(request.into_body(), DRAFT_BODY_LIMIT)
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read body: {}", e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))
}

/// Read the uploaded file out of a multipart body
async fn read_upload(request: Request, state: &AppState) -> Result<(String, Vec<u8>), ApiError> {
    let mut multipart = Multipart::from_request(request, state)
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart field: {}", e)))?
    {
        let Some(filename) = field.file_name().map(String::from) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;

        if bytes.is_empty() {
            return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
        }
        return Ok((filename, bytes.to_vec()));
    }

    Err(ApiError::BadRequest("No file uploaded".to_string()))
}

/// Validate a draft payload against the domain's field descriptors
///
/// Required fields must be present and non-empty; number fields must carry
/// a numeric value (or a string that parses as one, since HTML inputs send
/// strings); select fields must carry one of the declared options. Fields
/// outside the schema pass through untouched.
fn validate_draft(domain: PredictionDomain, draft: &Value) -> Result<(), ApiError> {
    let object = draft
        .as_object()
        .ok_or_else(|| ApiError::BadRequest("Draft payload must be a JSON object".to_string()))?;

    for descriptor in domain.descriptors() {
        let value = object.get(&descriptor.name).filter(|v| !v.is_null());

        let Some(value) = value else {
            if descriptor.required {
                return Err(ApiError::BadRequest(format!(
                    "Missing required field: {}",
                    descriptor.label
                )));
            }
            continue;
        };

        if matches!(value, Value::String(s) if s.trim().is_empty()) {
            if descriptor.required {
                return Err(ApiError::BadRequest(format!(
                    "Missing required field: {}",
                    descriptor.label
                )));
            }
            continue;
        }

        match &descriptor.kind {
            FieldKind::Text => {}
            FieldKind::Number => {
                let numeric = value.is_number()
                    || value
                        .as_str()
                        .map(|s| s.trim().parse::<f64>().is_ok())
                        .unwrap_or(false);
                if !numeric {
                    return Err(ApiError::BadRequest(format!(
                        "Field {} must be a number",
                        descriptor.label
                    )));
                }
            }
            FieldKind::Select { options } => {
                let valid = value
                    .as_str()
                    .map(|s| options.iter().any(|o| o == s))
                    .unwrap_or(false);
                if !valid {
                    return Err(ApiError::BadRequest(format!(
                        "Field {} must be one of: {}",
                        descriptor.label,
                        options.join(", ")
                    )));
                }
            }
        }
    }

    Ok(())
}
