//! Key-feature line rendering
//!
//! Models often format key features as markdown, either as a bullet with a
//! bold label (`* **Battery:** 4000mAh`) or as a bare bold label
//! (`**Battery:** 4000mAh`). These are split into a label and a value so the
//! display layer can emphasize the label. Anything else is shown as a plain
//! dash-prefixed value.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::FeatureLine;

/// `* **label:** value`
static BULLET_BOLD_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\*\s*\*\*([^:*]+):\*\*\s*(.*)$").expect("valid regex"));

/// `**label:** value`
static BOLD_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\*\*([^:*]+):\*\*\s*(.*)$").expect("valid regex"));

/// Split a key-feature string into an optional label and a value
///
/// The bullet form is tried before the bare bold form. Only the first colon
/// separates label from value, so the value may contain further colons.
pub fn split_feature_line(line: &str) -> FeatureLine {
    let line = line.trim();

    for pattern in [&*BULLET_BOLD_LABEL, &*BOLD_LABEL] {
        if let Some(caps) = pattern.captures(line) {
            return FeatureLine {
                label: Some(caps[1].trim().to_string()),
                value: caps[2].trim().to_string(),
            };
        }
    }

    FeatureLine {
        label: None,
        value: line.to_string(),
    }
}

/// Split every feature of a result, in order
pub fn split_feature_lines<S: AsRef<str>>(features: &[S]) -> Vec<FeatureLine> {
    features
        .iter()
        .map(|f| split_feature_line(f.as_ref()))
        .collect()
}
