//! Offline normalization of raw model replies

use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use glimpse_core::{normalize, Language};

use super::render::format_result;
use super::{load_settings, settings_path};

/// Read a raw reply from `file` (or stdin) and print the normalized result
pub fn cmd_parse(
    settings_file: Option<&Path>,
    file: Option<&Path>,
    language: Option<Language>,
    json: bool,
) -> Result<()> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let language = match language {
        Some(lang) => lang,
        None => load_settings(&settings_path(settings_file)?)?.language,
    };

    print!("{}", render_parsed(&raw, language, json)?);
    Ok(())
}

/// Normalize `raw` and render it as text or JSON
pub fn render_parsed(raw: &str, language: Language, json: bool) -> Result<String> {
    let result = normalize(raw);

    if json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(&result)?));
    }

    if !result.is_usable() {
        return Ok(format!("⚠️  {}\n", language.messages().analysis_failed));
    }

    Ok(format_result(&result, language))
}
