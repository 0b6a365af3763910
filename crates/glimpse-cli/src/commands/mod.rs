//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `analyze` - Image analysis with bounded retries
//! - `parse` - Offline normalization of a raw model reply
//! - `check` - Backend health check
//! - `config` - Settings management (language, backend)
//! - `prompts` - Prompt inspection
//! - `render` - Text rendering shared by analyze and parse

pub mod analyze;
pub mod check;
pub mod config;
pub mod parse;
pub mod prompts;
pub mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glimpse_core::settings::default_settings_path;
use glimpse_core::{Settings, VisionClient};

// Re-export command functions for main.rs
pub use analyze::*;
pub use check::*;
pub use config::*;
pub use parse::*;
pub use prompts::*;

/// Resolve the settings file: explicit path, else the platform default
pub fn settings_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => default_settings_path().context("Could not determine config directory"),
    }
}

/// Load settings from the resolved path
pub fn load_settings(path: &Path) -> Result<Settings> {
    Settings::load(path).with_context(|| format!("Failed to load settings from {}", path.display()))
}

/// Build a vision client
///
/// Backend priority: explicit flag > saved preference > `AI_BACKEND` env var.
pub fn build_client(settings: &Settings, backend: Option<&str>) -> Result<VisionClient> {
    let name = backend.or(settings.backend.as_deref());

    let client = match name {
        Some(name) => VisionClient::from_name(name),
        None => VisionClient::from_env(),
    };

    client.with_context(|| {
        format!(
            "Vision backend '{}' is not configured. Set GEMINI_API_KEY (gemini) or \
             OPENAI_COMPATIBLE_HOST (openai_compatible), or use --backend mock",
            name.unwrap_or("gemini")
        )
    })
}
