//! Error types for Glimpse

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Vision service error: {0}")]
    Transport(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Whether this error came from talking to the vision service
    ///
    /// Transport errors (including an undecodable response body) are
    /// retryable from the caller's point of view; everything else points at
    /// local input or configuration.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Http(_) | Error::Json(_) | Error::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_transport() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        assert!(Error::from(json_err).is_transport());
        assert!(Error::Transport("503".into()).is_transport());
        assert!(!Error::Config("bad".into()).is_transport());
        assert!(!Error::NotFound("image.jpg".into()).is_transport());
    }
}
