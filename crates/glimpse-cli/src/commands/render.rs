//! Text rendering of analysis results

use glimpse_core::{split_feature_lines, AnalysisResult, Language, ProductInfo};

/// Render a result as the plain-text screen the user sees
///
/// Key features go through the label/value splitter, so bold labels from the
/// model come out as `Label: value` and everything else as `- value`.
pub fn format_result(result: &AnalysisResult, language: Language) -> String {
    let messages = language.messages();
    let mut out = String::new();

    if !result.description.is_empty() {
        out.push_str(&format!("📝 {}\n", messages.description));
        out.push_str(&format!("{}\n", result.description));
    }

    if !result.key_features.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("✨ {}\n", messages.key_features));
        for line in split_feature_lines(&result.key_features) {
            out.push_str(&format!("  {}\n", line.render_plain()));
        }
    }

    if let Some(info) = &result.product_info {
        out.push('\n');
        out.push_str(&format_product_info(info, language));
    }

    out
}

fn format_product_info(info: &ProductInfo, language: Language) -> String {
    let messages = language.messages();
    let mut out = format!("📦 {}\n", messages.product_info);

    for (label, value) in [
        (messages.brand, &info.brand),
        (messages.model, &info.model),
        (messages.category, &info.category),
    ] {
        if !value.is_empty() {
            out.push_str(&format!("  {}: {}\n", label, value));
        }
    }
    if let Some(usage) = &info.usage {
        out.push_str(&format!("  {}: {}\n", messages.usage, usage));
    }
    for (label, items) in [
        (messages.specifications, &info.specifications),
        (messages.unique_features, &info.unique_features),
    ] {
        if !items.is_empty() {
            out.push_str(&format!("  {}:\n", label));
            for item in items {
                out.push_str(&format!("    - {}\n", item));
            }
        }
    }

    out
}
