//! Prediction domain definitions
//!
//! Each domain pairs an inference endpoint with the schema of inputs the
//! form collects for it. Field descriptors are declarative: the renderer
//! switches on `kind`, and required-field validation reads the same
//! descriptor the renderer does, so validation rules live in exactly one
//! place.

use serde::Serialize;

/// Input field kind, driving both rendering and value validation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Select { options: Vec<String> },
}

/// One input field of a domain's form schema
#[derive(Debug, Clone, Serialize)]
pub struct FieldDescriptor {
    /// Unique within the domain; doubles as the JSON key sent to the endpoint
    pub name: String,
    pub label: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldDescriptor {
    fn text(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: FieldKind::Text,
            required: true,
        }
    }

    fn number(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: FieldKind::Number,
            required: true,
        }
    }

    fn select(name: &str, label: &str, options: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: FieldKind::Select {
                options: options.iter().map(|o| o.to_string()).collect(),
            },
            required: true,
        }
    }

    fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// The five prediction contexts, each with its own schema and endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionDomain {
    General,
    Heart,
    Diabetes,
    LifeRisk,
    BrainTumor,
}

impl PredictionDomain {
    /// Parse a URL path segment into a domain
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "general" => Some(Self::General),
            "heart" => Some(Self::Heart),
            "diabetes" => Some(Self::Diabetes),
            "liferisk" => Some(Self::LifeRisk),
            "brain" => Some(Self::BrainTumor),
            _ => None,
        }
    }

    /// URL path segment and persisted `prediction_type` value
    pub fn slug(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Heart => "heart",
            Self::Diabetes => "diabetes",
            Self::LifeRisk => "liferisk",
            Self::BrainTumor => "brain",
        }
    }

    /// Title shown on the form page
    pub fn title(&self) -> &'static str {
        match self {
            Self::General => "General Health Check",
            Self::Heart => "Heart Disease Prediction",
            Self::Diabetes => "Diabetes Prediction",
            Self::LifeRisk => "Life Risk Assessment",
            Self::BrainTumor => "Brain Tumor Detection",
        }
    }

    /// Image domains submit one uploaded file instead of a JSON draft
    pub fn is_image(&self) -> bool {
        matches!(self, Self::BrainTumor)
    }

    /// Inference endpoint path, appended to the configured base URL
    pub fn endpoint_path(&self) -> String {
        format!("/predict/{}", self.slug())
    }

    /// Field descriptors for this domain's form
    ///
    /// Image domains have no field schema (the upload widget is fixed).
    pub fn descriptors(&self) -> Vec<FieldDescriptor> {
        match self {
            Self::General => vec![
                FieldDescriptor::number("age", "Age"),
                FieldDescriptor::select("gender", "Gender", &["Male", "Female"]),
                FieldDescriptor::number("bmi", "Body Mass Index"),
                FieldDescriptor::number("systolic_bp", "Systolic Blood Pressure"),
                FieldDescriptor::number("cholesterol", "Cholesterol (mg/dL)"),
                FieldDescriptor::select("smoker", "Smoker", &["Yes", "No"]),
            ],
            Self::Heart => vec![
                FieldDescriptor::number("age", "Age"),
                FieldDescriptor::select("sex", "Sex", &["M", "F"]),
                FieldDescriptor::select(
                    "chest_pain_type",
                    "Chest Pain Type",
                    &["ATA", "NAP", "ASY", "TA"],
                ),
                FieldDescriptor::number("resting_bp", "Resting Blood Pressure"),
                FieldDescriptor::number("cholesterol", "Cholesterol (mg/dL)"),
                FieldDescriptor::select("fasting_bs", "Fasting Blood Sugar > 120", &["0", "1"]),
                FieldDescriptor::number("max_hr", "Maximum Heart Rate"),
                FieldDescriptor::select("exercise_angina", "Exercise Angina", &["Y", "N"]),
                FieldDescriptor::number("oldpeak", "Oldpeak (ST depression)"),
            ],
            Self::Diabetes => vec![
                FieldDescriptor::number("pregnancies", "Pregnancies"),
                FieldDescriptor::number("glucose", "Glucose"),
                FieldDescriptor::number("blood_pressure", "Blood Pressure"),
                FieldDescriptor::number("skin_thickness", "Skin Thickness").optional(),
                FieldDescriptor::number("insulin", "Insulin").optional(),
                FieldDescriptor::number("bmi", "Body Mass Index"),
                FieldDescriptor::number("age", "Age"),
            ],
            Self::LifeRisk => vec![
                FieldDescriptor::number("age", "Age"),
                FieldDescriptor::select("smoker", "Smoker", &["Yes", "No"]),
                FieldDescriptor::select("alcohol", "Alcohol Use", &["None", "Moderate", "Heavy"]),
                FieldDescriptor::number("exercise_hours", "Exercise Hours per Week"),
                FieldDescriptor::text("chronic_conditions", "Chronic Conditions").optional(),
            ],
            Self::BrainTumor => Vec::new(),
        }
    }
}
