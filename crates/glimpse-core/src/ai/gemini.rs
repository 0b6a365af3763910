//! Google Gemini backend implementation
//!
//! Uses the `generateContent` REST endpoint with the image sent inline as
//! base64. The API key travels as the `key` query parameter.
//!
//! # Configuration
//!
//! Environment variables:
//! - `GEMINI_API_KEY`: API key (required)
//! - `GEMINI_MODEL`: Model name (default: gemini-1.5-flash)
//! - `GEMINI_HOST`: API base URL (default: https://generativelanguage.googleapis.com)

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::image::ImageInput;
use crate::prompts::PromptLibrary;
use crate::settings::Language;

use super::{describe_prompt, VisionBackend};

pub const DEFAULT_GEMINI_HOST: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Gemini vision backend
#[derive(Clone)]
pub struct GeminiBackend {
    http_client: Client,
    host: String,
    model: String,
    api_key: String,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl GeminiBackend {
    /// Create a new Gemini backend
    pub fn new(host: &str, model: &str, api_key: &str) -> Self {
        Self {
            http_client: Client::new(),
            host: host.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
        }
    }

    /// Use a specific prompt library (e.g. embedded only, for tests)
    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = Arc::new(RwLock::new(prompts));
        self
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    /// Create from environment variables
    ///
    /// Required: `GEMINI_API_KEY`
    /// Optional: `GEMINI_MODEL`, `GEMINI_HOST`
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").ok()?;
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
        let host = std::env::var("GEMINI_HOST").unwrap_or_else(|_| DEFAULT_GEMINI_HOST.to_string());
        Some(Self::new(&host, &model, &api_key))
    }

    fn generate_url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.host, self.model)
    }
}

/// `generateContent` request body
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

/// A text or inline-image part
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

impl GenerateContentRequest {
    fn describe(prompt: String, image: &ImageInput) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::Text { text: prompt },
                    RequestPart::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type().to_string(),
                            data: image.to_base64(),
                        },
                    },
                ],
            }],
        }
    }
}

/// `generateContent` response body (only the fields we read)
#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, or empty
    fn into_text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .unwrap_or_default()
    }
}

#[async_trait]
impl VisionBackend for GeminiBackend {
    async fn describe_image(
        &self,
        image: &ImageInput,
        language: Language,
        hint: Option<&str>,
    ) -> Result<String> {
        let prompt = describe_prompt(&self.prompts, language, hint)?;
        let request = GenerateContentRequest::describe(prompt, image);

        debug!(
            model = %self.model,
            mime_type = image.mime_type(),
            bytes = image.data().len(),
            "Sending Gemini generateContent request"
        );

        let response = self
            .http_client
            .post(self.generate_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport(format!(
                "Gemini API error {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let body: GenerateContentResponse = serde_json::from_str(&body)?;
        Ok(body.into_text())
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/v1beta/models/{}", self.host, self.model))
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.host
    }
}
