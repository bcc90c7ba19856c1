//! Error types and utilities for Tweetalytics

use thiserror::Error;

/// Result type alias for Tweetalytics operations
pub type Result<T> = std::result::Result<T, TweetalyticsError>;

/// Main error type for Tweetalytics operations
#[derive(Error, Debug)]
pub enum TweetalyticsError {
    /// Invalid caller input, raised before any external call is made
    #[error("Validation error: {message}")]
    Validation {
        /// Human readable description
        message: String,
        /// Name of the offending parameter, when known
        field: Option<String>,
    },

    /// Failure talking to the provider, chart service or link shortener
    #[error("Transport error: {message}")]
    Transport {
        /// Human readable description
        message: String,
        /// HTTP status returned by the remote service, if any
        status_code: Option<u16>,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        /// Human readable description
        message: String,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Chart rasterization errors
    #[error("Render error: {message}")]
    Render {
        /// Human readable description
        message: String,
        /// Underlying cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TweetalyticsError {
    /// Create a new validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
            status_code: None,
            source: None,
        }
    }

    /// Create a new transport error carrying the remote HTTP status
    pub fn transport_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::Transport {
            message: msg.into(),
            status_code: Some(status),
            source: None,
        }
    }

    /// Create a new transport error with source
    pub fn transport_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: msg.into(),
            status_code: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new render error
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new render error with source
    pub fn render_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Render {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error was raised by input validation
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Whether this error came from a remote collaborator
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// The parameter a validation error refers to
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }
}

/// Convert from reqwest::Error to TweetalyticsError
impl From<reqwest::Error> for TweetalyticsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::transport_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::transport_with_source("Connection failed", err)
        } else if err.is_status() {
            let status_code = err.status().map(|s| s.as_u16());
            Self::Transport {
                message: format!("HTTP error: {}", status_code.unwrap_or(0)),
                status_code,
                source: Some(Box::new(err)),
            }
        } else if err.is_decode() {
            Self::transport_with_source("Malformed response body", err)
        } else {
            Self::transport_with_source("Network request failed", err)
        }
    }
}
