//! Risk tier classification
//!
//! Maps a raw model-output label to a binary risk tier plus the display
//! metadata the UI shows alongside it. Tiers are always recomputed from the
//! stored `result` string when history is redisplayed; they are never
//! persisted.

use serde::Serialize;

/// Keywords whose presence (lower-cased substring match) marks a label as Detected
const DETECTED_KEYWORDS: [&str; 4] = ["high", "1", "yes", "positive"];

/// Binary risk classification derived from a prediction label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskTier {
    Normal,
    Detected,
}

impl RiskTier {
    /// Human-readable tier text shown next to a result
    pub fn display_text(&self) -> &'static str {
        match self {
            RiskTier::Normal => "Normal",
            RiskTier::Detected => "Risk Detected",
        }
    }

    /// CSS color class used by the result and history screens
    pub fn color_class(&self) -> &'static str {
        match self {
            RiskTier::Normal => "text-green-600",
            RiskTier::Detected => "text-red-600",
        }
    }

    /// Icon name used by the result and history screens
    pub fn icon(&self) -> &'static str {
        match self {
            RiskTier::Normal => "check-circle",
            RiskTier::Detected => "alert-triangle",
        }
    }
}

/// Classify a raw prediction label into a risk tier
///
/// Lower-cases the label and tests for substring membership in the detected
/// keyword set. `"tumor"` counts as a positive match only when the label does
/// not also contain `"no_tumor"` (image-model labels use `no_tumor` for the
/// negative class). Pure and total: any label, including the empty string,
/// yields a tier.
pub fn classify(label: &str) -> RiskTier {
    let lower = label.to_lowercase();

    if DETECTED_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return RiskTier::Detected;
    }

    if lower.contains("tumor") && !lower.contains("no_tumor") {
        return RiskTier::Detected;
    }

    RiskTier::Normal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_labels_detected() {
        assert_eq!(classify("High Risk"), RiskTier::Detected);
        assert_eq!(classify("1"), RiskTier::Detected);
        assert_eq!(classify("Yes"), RiskTier::Detected);
        assert_eq!(classify("POSITIVE"), RiskTier::Detected);
        assert_eq!(classify("ASY High Risk"), RiskTier::Detected);
    }

    #[test]
    fn test_plain_labels_normal() {
        assert_eq!(classify("0"), RiskTier::Normal);
        assert_eq!(classify("No"), RiskTier::Normal);
        assert_eq!(classify("negative result"), RiskTier::Normal);
        assert_eq!(classify("Unknown"), RiskTier::Normal);
        assert_eq!(classify(""), RiskTier::Normal);
    }

    #[test]
    fn test_tumor_detected_unless_negated() {
        assert_eq!(classify("tumor"), RiskTier::Detected);
        assert_eq!(classify("glioma_tumor"), RiskTier::Detected);
        // "no_tumor" contains "tumor" but is the negative class
        assert_eq!(classify("no_tumor"), RiskTier::Normal);
        assert_eq!(classify("NO_TUMOR"), RiskTier::Normal);
    }

    #[test]
    fn test_substring_match_inside_words() {
        // "1" anywhere in the label counts, matching upstream behavior
        assert_eq!(classify("class_1"), RiskTier::Detected);
        assert_eq!(classify("stage1"), RiskTier::Detected);
    }

    #[test]
    fn test_display_metadata() {
        assert_eq!(RiskTier::Detected.display_text(), "Risk Detected");
        assert_eq!(RiskTier::Detected.color_class(), "text-red-600");
        assert_eq!(RiskTier::Detected.icon(), "alert-triangle");
        assert_eq!(RiskTier::Normal.display_text(), "Normal");
        assert_eq!(RiskTier::Normal.color_class(), "text-green-600");
        assert_eq!(RiskTier::Normal.icon(), "check-circle");
    }
}
