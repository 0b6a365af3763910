//! Pluggable vision backend abstraction
//!
//! This module provides a backend-agnostic interface for describing images
//! with a remote generative model, plus the normalizer that turns the model's
//! free-form reply into an [`AnalysisResult`].
//!
//! # Architecture
//!
//! - `VisionBackend` trait: defines the interface for all vision backends
//! - `VisionClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `GeminiBackend`, `OpenAICompatibleBackend`, `MockBackend`
//! - `parsing::normalize`: reply normalization, shared by every backend
//!
//! # Usage
//!
//! ```rust,ignore
//! let client = VisionClient::from_env().expect("no backend configured");
//! let image = ImageInput::from_path(Path::new("photo.jpg"))?;
//! let result = client.analyze_image(&image, Language::English, None).await?;
//! println!("{}", result.description);
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (gemini, openai_compatible, mock). Default: gemini
//! - `GEMINI_API_KEY`: API key (required for gemini backend)
//! - `GEMINI_MODEL`: Model name (default: gemini-1.5-flash)
//! - `GEMINI_HOST`: API base URL (default: https://generativelanguage.googleapis.com)
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required for openai_compatible backend)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-4o-mini)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)
//! - `MOCK_REPLY`: Canned reply for the mock backend (optional)

mod gemini;
mod mock;
mod openai_compatible;
pub mod parsing;

pub use gemini::GeminiBackend;
pub use mock::MockBackend;
pub use openai_compatible::OpenAICompatibleBackend;
pub use parsing::{extract_json_span, normalize, StringOrStringList};

use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};
use crate::image::ImageInput;
use crate::models::AnalysisResult;
use crate::prompts::{PromptId, PromptLibrary};
use crate::settings::Language;

/// Trait defining the interface for all vision backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait VisionBackend: Send + Sync {
    /// Send an image to the model and return its raw reply text
    ///
    /// Non-2xx responses and network errors are returned as errors. A reply
    /// without any text is returned as an empty string.
    async fn describe_image(
        &self,
        image: &ImageInput,
        language: Language,
        hint: Option<&str>,
    ) -> Result<String>;

    /// Describe an image and normalize the reply
    async fn analyze_image(
        &self,
        image: &ImageInput,
        language: Language,
        hint: Option<&str>,
    ) -> Result<AnalysisResult> {
        let raw = self.describe_image(image, language, hint).await?;
        debug!(model = self.model(), "Vision reply: {}", raw);
        Ok(normalize(&raw))
    }

    /// Check if the backend is reachable
    async fn health_check(&self) -> bool;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Names accepted by [`VisionClient::from_name`]
pub const BACKEND_NAMES: &[&str] = &[
    "gemini",
    "google",
    "openai_compatible",
    "openai",
    "vllm",
    "localai",
    "llamacpp",
    "ollama",
    "mock",
];

/// Whether `name` selects a known backend
pub fn is_known_backend(name: &str) -> bool {
    BACKEND_NAMES.contains(&name.to_lowercase().as_str())
}

/// Concrete vision client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum VisionClient {
    /// Google Gemini `generateContent` API
    Gemini(GeminiBackend),
    /// OpenAI-compatible chat completions with image parts
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl VisionClient {
    /// Create a vision client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use. Returns None if
    /// the required environment variables for that backend are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "gemini".to_string());
        Self::from_name(&backend)
    }

    /// Create a vision client for a named backend, reading its settings from
    /// the environment
    pub fn from_name(backend: &str) -> Option<Self> {
        match backend.to_lowercase().as_str() {
            "gemini" | "google" => GeminiBackend::from_env().map(VisionClient::Gemini),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" | "ollama" => {
                OpenAICompatibleBackend::from_env().map(VisionClient::OpenAICompatible)
            }
            "mock" => Some(VisionClient::Mock(MockBackend::from_env())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown vision backend, falling back to gemini");
                GeminiBackend::from_env().map(VisionClient::Gemini)
            }
        }
    }

    /// Create a Gemini backend directly
    pub fn gemini(host: &str, model: &str, api_key: &str) -> Self {
        VisionClient::Gemini(GeminiBackend::new(host, model, api_key))
    }

    /// Create a mock backend that always returns `reply`
    pub fn mock(reply: &str) -> Self {
        VisionClient::Mock(MockBackend::with_reply(reply))
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            VisionClient::Gemini(b) => VisionClient::Gemini(b.with_model(model)),
            VisionClient::OpenAICompatible(b) => VisionClient::OpenAICompatible(b.with_model(model)),
            VisionClient::Mock(b) => VisionClient::Mock(b.with_model(model)),
        }
    }
}

#[async_trait]
impl VisionBackend for VisionClient {
    async fn describe_image(
        &self,
        image: &ImageInput,
        language: Language,
        hint: Option<&str>,
    ) -> Result<String> {
        match self {
            VisionClient::Gemini(b) => b.describe_image(image, language, hint).await,
            VisionClient::OpenAICompatible(b) => b.describe_image(image, language, hint).await,
            VisionClient::Mock(b) => b.describe_image(image, language, hint).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            VisionClient::Gemini(b) => b.health_check().await,
            VisionClient::OpenAICompatible(b) => b.health_check().await,
            VisionClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            VisionClient::Gemini(b) => b.model(),
            VisionClient::OpenAICompatible(b) => b.model(),
            VisionClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            VisionClient::Gemini(b) => b.host(),
            VisionClient::OpenAICompatible(b) => b.host(),
            VisionClient::Mock(b) => b.host(),
        }
    }
}

/// Render the image-description prompt from a shared library
pub(crate) fn describe_prompt(
    prompts: &RwLock<PromptLibrary>,
    language: Language,
    hint: Option<&str>,
) -> Result<String> {
    let mut prompts = prompts
        .write()
        .map_err(|_| Error::InvalidData("Failed to acquire prompt library lock".into()))?;
    let template = prompts.get(PromptId::DescribeImage)?;
    Ok(template.render_for_image(language, hint))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image() -> ImageInput {
        ImageInput::from_bytes(vec![0xFF, 0xD8, 0xFF, 0xE0]).unwrap()
    }

    #[test]
    fn test_is_known_backend() {
        assert!(is_known_backend("gemini"));
        assert!(is_known_backend("Ollama"));
        assert!(is_known_backend("mock"));
        assert!(!is_known_backend("claude"));
        assert!(!is_known_backend(""));
    }

    #[test]
    fn test_vision_client_mock() {
        let client = VisionClient::mock("A cat.");
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[test]
    fn test_from_name_mock() {
        let client = VisionClient::from_name("MOCK").unwrap();
        assert!(matches!(client, VisionClient::Mock(_)));
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = VisionClient::mock("");
        assert!(client.health_check().await);
    }

    #[tokio::test]
    async fn test_analyze_image_normalizes_reply() {
        let client = VisionClient::mock(
            "```json\n{\"description\": \"A red car.\", \"keyFeatures\": [\"Red color\", \"\"]}\n```",
        );
        let result = client
            .analyze_image(&test_image(), Language::English, None)
            .await
            .unwrap();
        assert_eq!(result.description, "A red car.");
        assert_eq!(result.key_features, vec!["Red color"]);
    }

    #[tokio::test]
    async fn test_analyze_image_propagates_transport_error() {
        let client = VisionClient::Mock(MockBackend::failing("boom"));
        let err = client
            .analyze_image(&test_image(), Language::English, None)
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_with_model() {
        let client = VisionClient::gemini("http://localhost:1", "gemini-1.5-flash", "key");
        let other = client.with_model("gemini-1.5-pro");
        assert_eq!(other.model(), "gemini-1.5-pro");
        assert_eq!(other.host(), "http://localhost:1");
    }

    #[test]
    fn test_describe_prompt_uses_language() {
        let prompts = RwLock::new(PromptLibrary::embedded_only());
        let prompt = describe_prompt(&prompts, Language::Korean, None).unwrap();
        assert!(prompt.contains("Korean"));
    }
}
