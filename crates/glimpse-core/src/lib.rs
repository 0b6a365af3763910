//! Glimpse Core Library
//!
//! Shared functionality for the Glimpse image analysis tool:
//! - Pluggable vision backends (Gemini, OpenAI-compatible, mock)
//! - Normalization of free-form model replies into structured results
//! - Key-feature line splitting for emphasis rendering
//! - Prompt library with user overrides
//! - Bounded-retry analysis sessions
//! - User settings (language, preferred backend)

pub mod ai;
pub mod error;
pub mod features;
pub mod image;
pub mod models;
pub mod prompts;
pub mod session;
pub mod settings;

/// Test utilities including mock Gemini server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    is_known_backend, normalize, GeminiBackend, MockBackend, OpenAICompatibleBackend, VisionBackend, VisionClient,
};
pub use error::{Error, Result};
pub use features::{split_feature_line, split_feature_lines};
pub use image::ImageInput;
pub use models::{AnalysisReport, AnalysisResult, FeatureLine, ProductInfo};
pub use prompts::{Prompt, PromptId, PromptLibrary};
pub use session::{AnalysisSession, AttemptOutcome, FailureReason, MAX_ATTEMPTS};
pub use settings::{Language, Settings};
