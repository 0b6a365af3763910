//! Mock backend for testing
//!
//! Returns canned replies without touching the network. Replies can be
//! scripted as a queue so retry behavior can be exercised deterministically.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::image::ImageInput;
use crate::settings::Language;

use super::VisionBackend;

/// Reply used when nothing else is configured
const DEFAULT_REPLY: &str = r#"{"description": "A smartphone lying on a wooden desk.", "keyFeatures": ["* **Display:** 6.1-inch OLED", "**Color:** Space black", "Triple camera module"], "productInfo": {"brand": "Acme", "model": "Phone 14", "category": "Smartphone", "specifications": ["128GB storage"], "usage": "Everyday communication", "uniqueFeatures": ["Ceramic front cover"]}}"#;

/// One scripted reply: raw text, or a transport failure message
pub type MockReply = std::result::Result<String, String>;

/// Mock vision backend for testing
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Scripted replies, consumed front to back
    queue: Arc<Mutex<VecDeque<MockReply>>>,
    /// Reply once the queue is empty
    fallback: MockReply,
    calls: Arc<AtomicU32>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::with_reply(DEFAULT_REPLY)
    }
}

impl MockBackend {
    /// Create a mock backend with the default product reply
    pub fn new() -> Self {
        Self::default()
    }

    /// Always reply with `reply`
    pub fn with_reply(reply: &str) -> Self {
        Self {
            healthy: true,
            queue: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Ok(reply.to_string()),
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Always fail as if the service returned an error
    pub fn failing(message: &str) -> Self {
        Self {
            fallback: Err(message.to_string()),
            ..Self::with_reply("")
        }
    }

    /// Play `replies` in order, then keep repeating the last one
    pub fn scripted(replies: Vec<MockReply>) -> Self {
        let fallback = replies.last().cloned().unwrap_or_else(|| Ok(String::new()));
        Self {
            queue: Arc::new(Mutex::new(replies.into())),
            fallback,
            ..Self::with_reply("")
        }
    }

    /// Create from `MOCK_REPLY`, or the default reply if unset
    pub fn from_env() -> Self {
        match std::env::var("MOCK_REPLY") {
            Ok(reply) => Self::with_reply(&reply),
            Err(_) => Self::new(),
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Create a new instance with a different model (no-op for mock)
    pub fn with_model(&self, _model: &str) -> Self {
        self.clone()
    }

    /// Number of describe calls made so far (shared across clones)
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_reply(&self) -> MockReply {
        let queued = self
            .queue
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front());
        queued.unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl VisionBackend for MockBackend {
    async fn describe_image(
        &self,
        _image: &ImageInput,
        _language: Language,
        _hint: Option<&str>,
    ) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.next_reply().map_err(Error::Transport)
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
