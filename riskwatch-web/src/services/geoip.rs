//! IP geolocation enrichment
//!
//! Adds an approximate country to each audit record. The lookup must never
//! block or fail the submission pipeline: every failure path (transport,
//! non-2xx status, parse, missing field) resolves to `"Unknown"`.

use serde_json::Value;
use tracing::debug;

/// Sentinel country when the lookup cannot produce one
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Resolve the submitting host's country name, best-effort
pub async fn lookup_country(http: &reqwest::Client, url: &str) -> String {
    match fetch_country(http, url).await {
        Ok(country) => country,
        Err(e) => {
            debug!("Geolocation lookup failed: {}", e);
            UNKNOWN_COUNTRY.to_string()
        }
    }
}

async fn fetch_country(http: &reqwest::Client, url: &str) -> Result<String, reqwest::Error> {
    let body: Value = http
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(body
        .get("country_name")
        .and_then(|v| v.as_str())
        .map(String::from)
        .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string()))
}
