//! Inference endpoint client
//!
//! Sends a draft payload (JSON) or an uploaded image (multipart) to the
//! per-domain inference endpoint and normalizes the heterogeneous response
//! shape. Endpoint providers disagree on key names, so the label and
//! confidence are pulled out by an explicit ordered-alias scan; a missing
//! key is never an error, it degrades to a sentinel.

use riskwatch_common::confidence;
use riskwatch_common::domains::PredictionDomain;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Label key aliases, in priority order
pub const LABEL_ALIASES: [&str; 4] = ["predicted_class", "prediction", "result", "output"];

/// Confidence key aliases, in priority order
pub const CONFIDENCE_ALIASES: [&str; 4] = ["confidence_score", "confidence", "accuracy", "probability"];

/// Sentinel label when no recognized key is present
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Inference client errors
///
/// These surface to the submitting user, unlike geolocation and persistence
/// failures which are absorbed downstream.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response; carries the server-supplied message when the error
    /// body was parseable
    #[error("{0}")]
    Server(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Label/confidence pair extracted from a raw inference response
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedResult {
    pub predicted_label: String,
    pub confidence_display: String,
}

/// Inference endpoint client
pub struct InferenceClient {
    http: reqwest::Client,
    base_url: String,
}

impl InferenceClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Submit a JSON draft payload to the domain's endpoint
    pub async fn submit_json(
        &self,
        domain: PredictionDomain,
        draft: &Value,
    ) -> Result<NormalizedResult, InferenceError> {
        let url = self.endpoint_url(domain);
        tracing::debug!(domain = domain.slug(), url = %url, "Submitting draft payload");

        let response = self
            .http
            .post(&url)
            .json(draft)
            .send()
            .await
            .map_err(|e| InferenceError::Network(e.to_string()))?;

        digest_response(response).await
    }

    /// Submit an uploaded image to the domain's endpoint
    ///
    /// The blob is wrapped in a multipart form with a single file field and
    /// no additional fields.
    pub async fn submit_image(
        &self,
        domain: PredictionDomain,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<NormalizedResult, InferenceError> {
        let url = self.endpoint_url(domain);
        tracing::debug!(
            domain = domain.slug(),
            filename = filename,
            size = bytes.len(),
            "Submitting image"
        );

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| InferenceError::Network(e.to_string()))?;

        digest_response(response).await
    }

    fn endpoint_url(&self, domain: PredictionDomain) -> String {
        format!("{}{}", self.base_url, domain.endpoint_path())
    }
}

async fn digest_response(response: reqwest::Response) -> Result<NormalizedResult, InferenceError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(InferenceError::Server(error_message(status.as_u16(), &body)));
    }

    let body: Value = response
        .json()
        .await
        .map_err(|e| InferenceError::Parse(e.to_string()))?;

    Ok(normalize_response(&body))
}

/// Extract the user-facing message from a non-2xx response body
///
/// Endpoints send `{"error": {"message": ...}}` in the common case; anything
/// else falls back to a generic status-code message.
fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(String::from)
        })
        .unwrap_or_else(|| format!("Server error: {}", status))
}

/// Normalize a raw inference response into a label/confidence pair
pub fn normalize_response(body: &Value) -> NormalizedResult {
    NormalizedResult {
        predicted_label: extract_label(body),
        confidence_display: confidence::normalize(extract_confidence(body)),
    }
}

/// First non-null value present under any of the aliases, in priority order
///
/// An explicit null under a higher-priority alias must not mask a value
/// under a lower-priority one; the scan continues past it.
fn lookup_alias<'a>(body: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .find_map(|key| body.get(*key).filter(|v| !v.is_null()))
}

fn extract_label(body: &Value) -> String {
    match lookup_alias(body, &LABEL_ALIASES) {
        Some(Value::String(label)) => label.clone(),
        // Numeric class labels (0/1) arrive as JSON numbers from some providers
        Some(other) => other.to_string(),
        None => UNKNOWN_LABEL.to_string(),
    }
}

fn extract_confidence(body: &Value) -> Option<f64> {
    lookup_alias(body, &CONFIDENCE_ALIASES).and_then(|v| v.as_f64())
}
