//! Application-wide error types using thiserror.

use tweetalytics_common::TweetalyticsError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// Query, configuration or collaborator failure.
    #[error(transparent)]
    Core(#[from] TweetalyticsError),

    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the JSON report failed.
    #[error("Output encoding error: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code: 2 for rejected input, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Core(err) if err.is_validation() => 2,
            _ => 1,
        }
    }
}

/// Result type for the command-line application.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let invalid: CliError = TweetalyticsError::validation_field("bad limit", "limit").into();
        assert_eq!(invalid.exit_code(), 2);
        assert_eq!(invalid.to_string(), "Validation error: bad limit");

        let remote: CliError = TweetalyticsError::transport("down").into();
        assert_eq!(remote.exit_code(), 1);
    }
}
