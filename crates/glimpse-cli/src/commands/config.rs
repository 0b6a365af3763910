//! Settings command implementations

use std::path::Path;

use anyhow::{bail, Context, Result};
use glimpse_core::ai::BACKEND_NAMES;
use glimpse_core::{is_known_backend, Language, Settings};

use super::{load_settings, settings_path};

/// Print current settings
pub fn cmd_config_show(settings_file: Option<&Path>) -> Result<()> {
    let path = settings_path(settings_file)?;
    let settings = load_settings(&path)?;

    println!("Settings ({}):\n", path.display());
    println!(
        "  language: {} ({})",
        settings.language,
        settings.language.display_name()
    );
    println!(
        "  backend:  {}",
        settings
            .backend
            .as_deref()
            .unwrap_or("(not set, uses AI_BACKEND)")
    );
    Ok(())
}

/// Save the preferred language
pub fn cmd_config_set_language(settings_file: Option<&Path>, language: Language) -> Result<()> {
    update_settings(settings_file, |s| s.language = language)?;
    println!("✅ Language set to {} ({})", language, language.display_name());
    Ok(())
}

/// Save the preferred backend
pub fn cmd_config_set_backend(settings_file: Option<&Path>, backend: &str) -> Result<()> {
    let backend = backend.trim().to_lowercase();
    if !is_known_backend(&backend) {
        bail!(
            "Unknown backend '{}'. Valid backends: {}",
            backend,
            BACKEND_NAMES.join(", ")
        );
    }
    update_settings(settings_file, |s| s.backend = Some(backend.clone()))?;
    println!("✅ Backend set to {}", backend);
    Ok(())
}

/// Print the settings file path
pub fn cmd_config_path(settings_file: Option<&Path>) -> Result<()> {
    println!("{}", settings_path(settings_file)?.display());
    Ok(())
}

fn update_settings(settings_file: Option<&Path>, apply: impl FnOnce(&mut Settings)) -> Result<()> {
    let path = settings_path(settings_file)?;
    let mut settings = load_settings(&path)?;
    apply(&mut settings);
    settings
        .save(&path)
        .with_context(|| format!("Failed to save settings to {}", path.display()))
}
