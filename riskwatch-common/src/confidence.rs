//! Confidence display formatting
//!
//! Upstream inference endpoints are inconsistent about confidence scale:
//! some return a 0..=1 fraction, others a pre-multiplied percentage. The
//! dual-scale heuristic here cannot distinguish a genuine 0-1% confidence
//! from a fractional encoding; that ambiguity is inherited from the
//! endpoints and intentionally left as-is.

/// Sentinel shown when no confidence value was present in the response
pub const NOT_AVAILABLE: &str = "N/A";

/// Format a raw confidence value for display
///
/// - `None` yields `"N/A"`
/// - values in `0.0..=1.0` are treated as fractions: `0.87` -> `"87.00%"`
/// - anything else is treated as an already-scaled percentage: `95.5` -> `"95.50%"`
pub fn normalize(raw: Option<f64>) -> String {
    match raw {
        None => NOT_AVAILABLE.to_string(),
        Some(c) if (0.0..=1.0).contains(&c) => format!("{:.2}%", c * 100.0),
        Some(c) => format!("{:.2}%", c),
    }
}
