//! Data models for Glimpse

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::Language;

/// Structured product information extracted from a vision reply
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInfo {
    /// Brand name (empty if the model did not name one)
    #[serde(default)]
    pub brand: String,
    /// Model name or number
    #[serde(default)]
    pub model: String,
    /// Product category
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub specifications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(default)]
    pub unique_features: Vec<String>,
}

impl ProductInfo {
    /// True when no field carries any content
    pub fn is_empty(&self) -> bool {
        self.brand.is_empty()
            && self.model.is_empty()
            && self.category.is_empty()
            && self.specifications.is_empty()
            && self.usage.is_none()
            && self.unique_features.is_empty()
    }
}

/// Normalized result of one image analysis
///
/// Built fresh for every reply. All strings are trimmed and list fields never
/// hold empty entries or markdown code-fence lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Free-text summary of the image
    #[serde(default)]
    pub description: String,
    /// Short phrases, one per visual attribute, in reply order
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_info: Option<ProductInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AnalysisResult {
    /// Whether the analysis carries anything worth showing
    ///
    /// A result is unusable only when both the description and the key
    /// features are empty.
    pub fn is_usable(&self) -> bool {
        !self.description.is_empty() || !self.key_features.is_empty()
    }
}

/// A key-feature string split for emphasis rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureLine {
    /// Bold label before the first colon, if the line used one
    pub label: Option<String>,
    pub value: String,
}

impl FeatureLine {
    /// Render without styling: `label: value` or `- value`
    pub fn render_plain(&self) -> String {
        match &self.label {
            Some(label) => format!("{}: {}", label, self.value),
            None => format!("- {}", self.value),
        }
    }
}

/// Analysis result plus the metadata of the call that produced it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    /// Model that produced the reply
    pub model: String,
    /// Language the reply was requested in
    pub language: Language,
    /// SHA-256 of the image bytes (hex)
    pub image_hash: String,
    /// Number of attempts it took to get a usable result
    pub attempts: u32,
    pub analyzed_at: DateTime<Utc>,
}
