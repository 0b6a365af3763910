//! User settings
//!
//! Settings are a small TOML file in the platform config directory
//! (`~/.config/glimpse/settings.toml` on Linux). A missing file means
//! defaults. Values are loaded once and passed explicitly to whatever needs
//! them; nothing reads settings from global state.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Language for prompts and user-facing messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ko")]
    Korean,
}

impl Language {
    /// Short code used in settings files and on the command line
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Korean => "ko",
        }
    }

    /// Name of the language as the model should see it in a prompt
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Korean => "Korean",
        }
    }

    pub fn all() -> &'static [Language] {
        &[Self::English, Self::Korean]
    }

    /// Localized user-facing strings
    pub fn messages(&self) -> &'static Messages {
        match self {
            Self::English => &ENGLISH,
            Self::Korean => &KOREAN,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "ko" | "kr" | "korean" => Ok(Self::Korean),
            other => Err(Error::Config(format!(
                "Unknown language '{}' (expected en or ko)",
                other
            ))),
        }
    }
}

/// Localized strings shown around an analysis
#[derive(Debug)]
pub struct Messages {
    pub analyzing: &'static str,
    pub description: &'static str,
    pub key_features: &'static str,
    pub product_info: &'static str,
    pub brand: &'static str,
    pub model: &'static str,
    pub category: &'static str,
    pub specifications: &'static str,
    pub usage: &'static str,
    pub unique_features: &'static str,
    pub analysis_failed: &'static str,
    pub service_unavailable: &'static str,
    pub retry_prompt: &'static str,
    pub attempts_exhausted: &'static str,
}

static ENGLISH: Messages = Messages {
    analyzing: "Analyzing image with AI...",
    description: "Description",
    key_features: "Key Features",
    product_info: "Product Info",
    brand: "Brand",
    model: "Model",
    category: "Category",
    specifications: "Specifications",
    usage: "Usage",
    unique_features: "Unique Features",
    analysis_failed: "Could not analyze the image. Please try again with a clearer photo.",
    service_unavailable: "The analysis service is unavailable right now.",
    retry_prompt: "Retry?",
    attempts_exhausted: "Analysis failed after the maximum number of attempts.",
};

static KOREAN: Messages = Messages {
    analyzing: "AI가 이미지를 분석하고 있습니다...",
    description: "설명",
    key_features: "주요 특징",
    product_info: "제품 정보",
    brand: "브랜드",
    model: "모델",
    category: "카테고리",
    specifications: "사양",
    usage: "용도",
    unique_features: "고유 특징",
    analysis_failed: "이미지를 분석할 수 없습니다. 더 선명한 사진으로 다시 시도해 주세요.",
    service_unavailable: "현재 분석 서비스를 사용할 수 없습니다.",
    retry_prompt: "다시 시도하시겠습니까?",
    attempts_exhausted: "최대 시도 횟수를 초과하여 분석에 실패했습니다.",
};

/// Persisted user settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Reply and UI language
    #[serde(default)]
    pub language: Language,
    /// Preferred vision backend (overrides `AI_BACKEND` when set)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
}

impl Settings {
    /// Load settings from `path`, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read settings: {}", e)))?;
        Self::parse(&content)
    }

    /// Parse settings from TOML content
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid settings TOML: {}", e)))
    }

    /// Write settings to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize settings: {}", e)))?;
        fs::write(path, content)?;
        debug!(path = %path.display(), "Saved settings");
        Ok(())
    }
}

/// Default settings file location
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("glimpse").join("settings.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_str() {
        assert_eq!("en".parse::<Language>().unwrap(), Language::English);
        assert_eq!("KO".parse::<Language>().unwrap(), Language::Korean);
        assert_eq!(" korean ".parse::<Language>().unwrap(), Language::Korean);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_language_code_round_trip() {
        for lang in Language::all() {
            assert_eq!(lang.code().parse::<Language>().unwrap(), *lang);
        }
    }

    #[test]
    fn test_messages_localized() {
        assert_eq!(Language::English.messages().description, "Description");
        assert_eq!(Language::Korean.messages().description, "설명");
    }

    #[test]
    fn test_settings_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.language, Language::English);
    }

    #[test]
    fn test_settings_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let settings = Settings {
            language: Language::Korean,
            backend: Some("mock".into()),
        };
        settings.save(&path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("language = \"ko\""));

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_settings_parse_partial() {
        let settings = Settings::parse("language = \"ko\"\n").unwrap();
        assert_eq!(settings.language, Language::Korean);
        assert_eq!(settings.backend, None);
    }

    #[test]
    fn test_settings_parse_invalid() {
        assert!(Settings::parse("language = \"xx\"").is_err());
        assert!(Settings::parse("not toml at all [").is_err());
    }
}
