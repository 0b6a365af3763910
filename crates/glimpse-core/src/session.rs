//! Bounded-retry analysis session
//!
//! A session covers one visit to the result screen: the user submits an
//! image, and if the analysis fails they may retry up to [`MAX_ATTEMPTS`]
//! times in total before the only option left is to abandon. An unusable
//! reply and a transport failure are treated the same way. Each attempt is
//! an independent call; only the counter carries over.

use tracing::{info, warn};

use crate::ai::VisionBackend;
use crate::image::ImageInput;
use crate::models::AnalysisResult;
use crate::settings::Language;

/// Maximum number of analysis attempts per session
pub const MAX_ATTEMPTS: u32 = 3;

/// Why an attempt did not produce a usable result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The reply normalized to an empty description and no key features
    EmptyResult,
    /// The request failed (network error, non-2xx, undecodable body)
    Transport(String),
}

impl FailureReason {
    /// Localized message for the user
    pub fn message(&self, language: Language) -> &'static str {
        let messages = language.messages();
        match self {
            Self::EmptyResult => messages.analysis_failed,
            Self::Transport(_) => messages.service_unavailable,
        }
    }
}

/// Result of a single attempt
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// The analysis is usable and the session is done
    Ready(AnalysisResult),
    /// The attempt failed; the caller may retry while `attempts_left > 0`
    Failed {
        reason: FailureReason,
        attempts_left: u32,
    },
    /// No attempts remain; no request was made
    Exhausted,
    /// An earlier attempt already produced a result; no request was made
    Completed,
}

/// Per-visit attempt counter and language
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    language: Language,
    hint: Option<String>,
    attempts: u32,
    completed: bool,
}

impl AnalysisSession {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            hint: None,
            attempts: 0,
            completed: false,
        }
    }

    /// Pass a short user-supplied hint about the subject along with each request
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Attempts made so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn attempts_left(&self) -> u32 {
        MAX_ATTEMPTS.saturating_sub(self.attempts)
    }

    /// Whether another attempt is allowed
    pub fn can_retry(&self) -> bool {
        !self.completed && self.attempts_left() > 0
    }

    /// Run one attempt against `backend`
    pub async fn attempt<B>(&mut self, backend: &B, image: &ImageInput) -> AttemptOutcome
    where
        B: VisionBackend + ?Sized,
    {
        if self.completed {
            return AttemptOutcome::Completed;
        }
        if self.attempts >= MAX_ATTEMPTS {
            return AttemptOutcome::Exhausted;
        }
        self.attempts += 1;

        info!(
            attempt = self.attempts,
            max = MAX_ATTEMPTS,
            model = backend.model(),
            "Analyzing image"
        );

        let reason = match backend
            .analyze_image(image, self.language, self.hint.as_deref())
            .await
        {
            Ok(result) if result.is_usable() => {
                self.completed = true;
                return AttemptOutcome::Ready(result);
            }
            Ok(_) => FailureReason::EmptyResult,
            Err(e) => FailureReason::Transport(e.to_string()),
        };

        warn!(attempt = self.attempts, reason = ?reason, "Analysis attempt failed");

        AttemptOutcome::Failed {
            reason,
            attempts_left: self.attempts_left(),
        }
    }
}
