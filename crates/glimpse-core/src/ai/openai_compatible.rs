//! OpenAI-compatible backend implementation
//!
//! Works with any server that implements the OpenAI chat completions API and
//! accepts `image_url` content parts (OpenAI, vLLM, LocalAI, llama-server,
//! Ollama's `/v1` endpoint).
//!
//! # Configuration
//!
//! Environment variables:
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-4o-mini)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

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

/// OpenAI-compatible vision backend
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl OpenAICompatibleBackend {
    /// Create a new OpenAI-compatible backend
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
        }
    }

    /// Create with an API key
    pub fn with_api_key(base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            api_key: Some(api_key.to_string()),
            ..Self::new(base_url, model)
        }
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
    /// Required: `OPENAI_COMPATIBLE_HOST`
    /// Optional: `OPENAI_COMPATIBLE_MODEL` (default: gpt-4o-mini)
    /// Optional: `OPENAI_COMPATIBLE_API_KEY`
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OPENAI_COMPATIBLE_HOST").ok()?;
        let model =
            std::env::var("OPENAI_COMPATIBLE_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let api_key = std::env::var("OPENAI_COMPATIBLE_API_KEY").ok();

        let mut backend = Self::new(&host, &model);
        backend.api_key = api_key;
        Some(backend)
    }
}

/// OpenAI chat completion request
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

/// Content part for multimodal messages
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl VisionBackend for OpenAICompatibleBackend {
    async fn describe_image(
        &self,
        image: &ImageInput,
        language: Language,
        hint: Option<&str>,
    ) -> Result<String> {
        let prompt = describe_prompt(&self.prompts, language, hint)?;

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text { text: prompt },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image.to_data_url(),
                        },
                    },
                ],
            }],
            temperature: Some(0.2),
            max_tokens: Some(2048),
            stream: false,
        };

        debug!(model = %self.model, "Sending OpenAI-compatible vision request");

        let mut req_builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&request);

        if let Some(ref api_key) = self.api_key {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport(format!(
                "OpenAI API error {}: {}",
                status, body
            )));
        }

        let chat_response: ChatCompletionResponse = response.json().await?;

        Ok(chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }

    async fn health_check(&self) -> bool {
        // Try /v1/models first (standard OpenAI endpoint)
        let mut req = self.http_client.get(format!("{}/v1/models", self.base_url));
        if let Some(ref api_key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }
        if let Ok(resp) = req.send().await {
            if resp.status().is_success() {
                return true;
            }
        }

        // Try /health (common for LocalAI and llama-server)
        if let Ok(resp) = self
            .http_client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
        {
            return resp.status().is_success();
        }

        false
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_new() {
        let backend = OpenAICompatibleBackend::new("http://localhost:8000/", "llava");
        assert_eq!(backend.model(), "llava");
        assert_eq!(backend.host(), "http://localhost:8000");
        assert!(backend.api_key.is_none());
    }

    #[test]
    fn test_backend_with_api_key() {
        let backend = OpenAICompatibleBackend::with_api_key("http://localhost:8000", "gpt-4o", "sk-x");
        assert_eq!(backend.api_key.as_deref(), Some("sk-x"));
        assert_eq!(backend.with_model("gpt-4o-mini").api_key.as_deref(), Some("sk-x"));
    }

    #[test]
    fn test_content_parts_serialization() {
        let message = ChatMessage {
            role: "user".to_string(),
            content: vec![
                ContentPart::Text {
                    text: "Describe this image".to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: "data:image/jpeg;base64,abc123".to_string(),
                    },
                },
            ],
        };

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][0]["text"], "Describe this image");
        assert_eq!(json["content"][1]["type"], "image_url");
        assert_eq!(
            json["content"][1]["image_url"]["url"],
            "data:image/jpeg;base64,abc123"
        );
    }

    #[test]
    fn test_response_with_null_content() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        let response: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert!(response.choices[0].message.content.is_none());
    }

    #[tokio::test]
    async fn test_health_check_unreachable() {
        let backend = OpenAICompatibleBackend::new("http://localhost:99999", "llava");
        assert!(!backend.health_check().await);
    }
}
