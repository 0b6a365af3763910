//! Normalization of vision model replies
//!
//! Models rarely return exactly what the prompt asks for. A reply may be a
//! clean JSON object, a JSON object wrapped in prose or markdown fences,
//! plain free text, or nothing at all. [`normalize`] turns any of these into
//! an [`AnalysisResult`] and never fails: malformed JSON falls back to
//! line splitting, and empty input yields an empty (unusable) result.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::models::{AnalysisResult, ProductInfo};

const CODE_FENCE: &str = "```";

/// A JSON field that may hold either a list of strings or one delimited string
///
/// List elements that are not strings are dropped. A single string is split
/// on newlines and commas.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StringOrStringList {
    List(Vec<Value>),
    Single(String),
}

impl StringOrStringList {
    /// Decode from an arbitrary JSON value, `None` for any other shape
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(Self::List(items.clone())),
            Value::String(s) => Some(Self::Single(s.clone())),
            _ => None,
        }
    }

    /// Flatten into trimmed, non-empty, fence-free strings in reply order
    pub fn into_vec(self) -> Vec<String> {
        let items: Vec<String> = match self {
            Self::List(values) => values
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            Self::Single(s) => s
                .split(['\n', ','])
                .map(str::to_string)
                .collect(),
        };
        clean_list(items.iter().map(String::as_str))
    }
}

/// Normalize a raw vision reply into an [`AnalysisResult`]
///
/// Strategies are tried in order and the first that applies wins:
/// 1. blank input gives an empty result
/// 2. the first-`{`-to-last-`}` span parsed as a JSON object
/// 3. line splitting: first line is the description, the rest are features
pub fn normalize(raw: &str) -> AnalysisResult {
    let text = raw.trim();
    if text.is_empty() {
        return AnalysisResult::default();
    }

    let result = match parse_json_reply(text) {
        Some(result) => result,
        None => {
            debug!(
                "No parseable JSON in vision reply, falling back to line split | Raw: {}",
                preview(text, 200)
            );
            parse_plain_reply(text)
        }
    };

    strip_fences(result)
}

/// Locate the greedy JSON span: first `{` through last `}`
///
/// This is not a balanced-brace scan. Braces in prose after the payload
/// widen the span and make the JSON parse fail, which sends the reply down
/// the line-split path instead.
pub fn extract_json_span(text: &str) -> Option<&str> {
    let start = text.find('{');
    let end = text.rfind('}');

    match (start, end) {
        (Some(s), Some(e)) if s < e => Some(&text[s..=e]),
        _ => None,
    }
}

fn parse_json_reply(text: &str) -> Option<AnalysisResult> {
    let span = extract_json_span(text)?;
    let value: Value = match serde_json::from_str(span) {
        Ok(v) => v,
        Err(e) => {
            debug!("Invalid JSON in vision reply: {}", e);
            return None;
        }
    };
    let obj = value.as_object()?;

    let description = string_field(obj, &["description"]).unwrap_or_default();
    let key_features = list_field(obj, &["keyFeatures", "key_features"]);
    let product_info = obj
        .get("productInfo")
        .or_else(|| obj.get("product_info"))
        .and_then(Value::as_object)
        .map(parse_product_info)
        .filter(|info| !info.is_empty());

    Some(AnalysisResult {
        description,
        key_features,
        product_info,
        object_type: string_field(obj, &["objectType", "object_type"]),
        object_name: string_field(obj, &["objectName", "object_name"]),
        details: string_field(obj, &["details"]),
    })
}

fn parse_product_info(obj: &Map<String, Value>) -> ProductInfo {
    ProductInfo {
        brand: string_field(obj, &["brand"]).unwrap_or_default(),
        model: string_field(obj, &["model"]).unwrap_or_default(),
        category: string_field(obj, &["category"]).unwrap_or_default(),
        specifications: list_field(obj, &["specifications"]),
        usage: string_field(obj, &["usage"]),
        unique_features: list_field(obj, &["uniqueFeatures", "unique_features"]),
    }
}

fn parse_plain_reply(text: &str) -> AnalysisResult {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    let description = lines.next().unwrap_or_default().to_string();
    let key_features = lines
        .filter(|l| !is_fence(l) && *l != "{" && *l != "}")
        .map(str::to_string)
        .collect();

    AnalysisResult {
        description,
        key_features,
        ..Default::default()
    }
}

/// Drop fence markers that survived either strategy
fn strip_fences(mut result: AnalysisResult) -> AnalysisResult {
    if is_fence(&result.description) {
        result.description.clear();
    }
    result.key_features.retain(|f| !is_fence(f));
    result
}

/// First string value among `keys`, trimmed; `None` if missing, non-string or blank
fn string_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| obj.get(*k))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn list_field(obj: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .find_map(|k| obj.get(*k))
        .and_then(StringOrStringList::from_value)
        .map(StringOrStringList::into_vec)
        .unwrap_or_default()
}

fn clean_list<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items
        .map(str::trim)
        .filter(|s| !s.is_empty() && !is_fence(s))
        .map(str::to_string)
        .collect()
}

fn is_fence(s: &str) -> bool {
    s.trim_start().starts_with(CODE_FENCE)
}

/// Char-boundary-safe truncation for log output
fn preview(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_clean_json() {
        let response = r#"{"description": "A red car.", "keyFeatures": ["Red color", "Four doors", ""]}"#;
        let result = normalize(response);
        assert_eq!(result.description, "A red car.");
        assert_eq!(result.key_features, vec!["Red color", "Four doors"]);
        assert!(result.product_info.is_none());
    }

    #[test]
    fn test_normalize_json_with_text() {
        let response = "Here is the result:\n{\"description\":\"A cat.\",\"keyFeatures\":[\"Fluffy\"]}\nThanks.";
        let result = normalize(response);
        assert_eq!(result.description, "A cat.");
        assert_eq!(result.key_features, vec!["Fluffy"]);
    }

    #[test]
    fn test_normalize_json_in_markdown_fence() {
        let response = "```json\n{\n  \"description\": \"  A laptop on a desk. \",\n  \"keyFeatures\": [\" Silver body \", \"Backlit keyboard\"]\n}\n```";
        let result = normalize(response);
        assert_eq!(result.description, "A laptop on a desk.");
        assert_eq!(result.key_features, vec!["Silver body", "Backlit keyboard"]);
    }

    #[test]
    fn test_normalize_plain_text() {
        let result = normalize("A mountain landscape.\nSnow-capped peaks\nClear blue sky");
        assert_eq!(result.description, "A mountain landscape.");
        assert_eq!(result.key_features, vec!["Snow-capped peaks", "Clear blue sky"]);
    }

    #[test]
    fn test_normalize_empty_and_whitespace() {
        for input in ["", "   ", "\n\t\n"] {
            let result = normalize(input);
            assert_eq!(result.description, "");
            assert!(result.key_features.is_empty());
            assert!(!result.is_usable());
        }
    }

    #[test]
    fn test_normalize_key_features_as_single_string() {
        let response = r#"{"description": "A bike.", "keyFeatures": "Red frame, Drop handlebars\nDisc brakes,"}"#;
        let result = normalize(response);
        assert_eq!(
            result.key_features,
            vec!["Red frame", "Drop handlebars", "Disc brakes"]
        );
    }

    #[test]
    fn test_normalize_drops_non_string_elements() {
        let response = r#"{"description": "A box.", "keyFeatures": ["Cardboard", 42, null, {"a": 1}, " Taped "]}"#;
        let result = normalize(response);
        assert_eq!(result.key_features, vec!["Cardboard", "Taped"]);
    }

    #[test]
    fn test_normalize_non_string_description_is_empty() {
        let response = r#"{"description": 12, "keyFeatures": ["Round"]}"#;
        let result = normalize(response);
        assert_eq!(result.description, "");
        assert_eq!(result.key_features, vec!["Round"]);
    }

    #[test]
    fn test_normalize_key_features_wrong_type() {
        let response = r#"{"description": "A lamp.", "keyFeatures": 3}"#;
        let result = normalize(response);
        assert_eq!(result.description, "A lamp.");
        assert!(result.key_features.is_empty());
    }

    #[test]
    fn test_normalize_product_info() {
        let response = r#"{
            "description": "A smartphone.",
            "keyFeatures": ["OLED display"],
            "productInfo": {
                "brand": " Apple ",
                "model": "iPhone 14 Pro",
                "category": 7,
                "specifications": ["6.1-inch display", "", "A16 Bionic", false],
                "usage": "  Everyday communication ",
                "uniqueFeatures": "Dynamic Island, Always-on display"
            }
        }"#;
        let result = normalize(response);
        let info = result.product_info.expect("product info");
        assert_eq!(info.brand, "Apple");
        assert_eq!(info.model, "iPhone 14 Pro");
        assert_eq!(info.category, "");
        assert_eq!(info.specifications, vec!["6.1-inch display", "A16 Bionic"]);
        assert_eq!(info.usage.as_deref(), Some("Everyday communication"));
        assert_eq!(
            info.unique_features,
            vec!["Dynamic Island", "Always-on display"]
        );
    }

    #[test]
    fn test_normalize_product_info_not_an_object() {
        let response = r#"{"description": "A mug.", "productInfo": "ceramic"}"#;
        let result = normalize(response);
        assert!(result.product_info.is_none());
    }

    #[test]
    fn test_normalize_extra_fields_carried_through() {
        let response = r#"{"description": "A dog.", "objectType": "animal", "objectName": "Beagle", "details": "Sitting on grass"}"#;
        let result = normalize(response);
        assert_eq!(result.object_type.as_deref(), Some("animal"));
        assert_eq!(result.object_name.as_deref(), Some("Beagle"));
        assert_eq!(result.details.as_deref(), Some("Sitting on grass"));
    }

    #[test]
    fn test_normalize_snake_case_keys() {
        let response = r#"{"description": "A chair.", "key_features": ["Wooden"], "product_info": {"brand": "Ikea"}}"#;
        let result = normalize(response);
        assert_eq!(result.key_features, vec!["Wooden"]);
        assert_eq!(result.product_info.unwrap().brand, "Ikea");
    }

    #[test]
    fn test_normalize_malformed_json_falls_back() {
        let response = "A desk lamp.\n{\"description\": \"broken\",\n- Adjustable arm\n}";
        let result = normalize(response);
        assert_eq!(result.description, "A desk lamp.");
        assert_eq!(
            result.key_features,
            vec!["{\"description\": \"broken\",", "- Adjustable arm"]
        );
    }

    #[test]
    fn test_normalize_fallback_skips_braces_and_fences() {
        let response = "A kettle.\n```\n{\nStainless steel\n}\n```";
        let result = normalize(response);
        assert_eq!(result.description, "A kettle.");
        assert_eq!(result.key_features, vec!["Stainless steel"]);
    }

    #[test]
    fn test_normalize_fence_description_discarded() {
        let response = "```markdown\nBlue sofa\nThree seats";
        let result = normalize(response);
        assert_eq!(result.description, "");
        assert_eq!(result.key_features, vec!["Blue sofa", "Three seats"]);
        assert!(result.is_usable());
    }

    #[test]
    fn test_normalize_fence_entries_removed_from_json_lists() {
        let response = r#"{"description": "```json", "keyFeatures": ["```", "Green"]}"#;
        let result = normalize(response);
        assert_eq!(result.description, "");
        assert_eq!(result.key_features, vec!["Green"]);
    }

    #[test]
    fn test_normalize_fence_entries_removed_from_product_lists() {
        let response = r#"{"description": "A drill.", "productInfo": {"brand": "Acme", "specifications": ["```", " 18V "], "uniqueFeatures": ["```json", "Brushless motor", "```"]}}"#;
        let info = normalize(response).product_info.unwrap();
        assert_eq!(info.specifications, vec!["18V"]);
        assert_eq!(info.unique_features, vec!["Brushless motor"]);
    }

    #[test]
    fn test_normalize_json_array_is_not_an_object() {
        // The greedy span covers both objects and is not valid JSON.
        let response = r#"[{"a": 1}, {"b": 2}]"#;
        let result = normalize(response);
        assert_eq!(result.description, r#"[{"a": 1}, {"b": 2}]"#);
    }

    #[test]
    fn test_greedy_span_with_trailing_brace_in_prose() {
        let response = "{\"description\": \"A pen.\"}\nNote: use {placeholders} carefully";
        let span = extract_json_span(response).unwrap();
        assert!(span.ends_with("{placeholders}"));

        // The widened span does not parse, so the line split takes over.
        let result = normalize(response);
        assert_eq!(result.description, "{\"description\": \"A pen.\"}");
        assert_eq!(
            result.key_features,
            vec!["Note: use {placeholders} carefully"]
        );
    }

    #[test]
    fn test_extract_json_span() {
        assert_eq!(extract_json_span("x {\"a\":1} y"), Some("{\"a\":1}"));
        assert_eq!(extract_json_span("no braces"), None);
        assert_eq!(extract_json_span("} reversed {"), None);
        assert_eq!(extract_json_span("{"), None);
    }

    #[test]
    fn test_string_or_string_list_decodes_both_shapes() {
        let list: StringOrStringList = serde_json::from_str(r#"["a", 1, " b "]"#).unwrap();
        assert_eq!(list.into_vec(), vec!["a", "b"]);

        let single: StringOrStringList = serde_json::from_str(r#""a, b\nc""#).unwrap();
        assert_eq!(single.into_vec(), vec!["a", "b", "c"]);

        assert!(StringOrStringList::from_value(&Value::Bool(true)).is_none());
    }

    #[test]
    fn test_preview_is_char_safe() {
        let korean = "고양이".repeat(100);
        let p = preview(&korean, 5);
        assert_eq!(p, "고양이고양...");
        assert_eq!(preview("short", 10), "short");
    }
}
