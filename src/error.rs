//! Error types for repolens
//!
//! All modules use `LensResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for repolens operations
pub type LensResult<T> = Result<T, LensError>;

/// All errors that can occur in repolens
#[derive(Error, Debug)]
pub enum LensError {
    // Reference and remote errors
    #[error("Invalid repository reference: {0}")]
    InvalidReference(String),

    #[error("Not found on remote: {0}")]
    NotFound(String),

    #[error("GitHub rate limit exceeded{}", reset_suffix(.reset_at))]
    RateLimited { reset_at: Option<i64> },

    #[error("Remote unavailable: {0}")]
    UpstreamUnavailable(String),

    // Archive errors
    #[error("Archive extraction failed: {0}")]
    ExtractionFailed(String),

    // Cache errors
    #[error("Cache IO error: {context}")]
    CacheIo {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Repository not cached: {0}")]
    NotCached(String),

    #[error("File not found in repository: {0}")]
    FileNotFound(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

fn reset_suffix(reset_at: &Option<i64>) -> String {
    match reset_at.and_then(|ts| chrono::DateTime::from_timestamp(ts, 0)) {
        Some(at) => format!(" (resets at {})", at.format("%H:%M:%S UTC")),
        None => String::new(),
    }
}

impl LensError {
    /// Create a cache IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::CacheIo {
            context: context.into(),
            source,
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::UpstreamUnavailable(_))
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::RateLimited { .. } => {
                Some("Supply a token with --token, GITHUB_TOKEN, or github.token in config")
            }
            Self::NotCached(_) => Some("Run: repolens list"),
            Self::InvalidReference(_) => Some("Use owner/repo, owner/repo@branch, or a github.com URL"),
            Self::UpstreamUnavailable(_) => Some("Check your network connection and retry"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = LensError::NotCached("octo_hello".to_string());
        assert!(err.to_string().contains("not cached"));
    }

    #[test]
    fn rate_limited_display_includes_reset() {
        let err = LensError::RateLimited {
            reset_at: Some(0),
        };
        assert!(err.to_string().contains("resets at 00:00:00 UTC"));

        let err = LensError::RateLimited { reset_at: None };
        assert_eq!(err.to_string(), "GitHub rate limit exceeded");
    }

    #[test]
    fn error_hint() {
        let err = LensError::RateLimited { reset_at: None };
        assert!(err.hint().unwrap().contains("GITHUB_TOKEN"));
        assert_eq!(LensError::FileNotFound("a".into()).hint(), None);
    }

    #[test]
    fn error_retryable() {
        assert!(LensError::UpstreamUnavailable("timeout".into()).is_retryable());
        assert!(!LensError::ExtractionFailed("bad".into()).is_retryable());
    }
}
