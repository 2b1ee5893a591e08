use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from local files (uploads, downloads, config, log file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Non-2xx response from the file API.
    #[error("Error: {status} {reason}")]
    Http { status: u16, reason: String },

    /// Transport-level failure (connection refused, timeout, bad URL).
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A response body that could not be decoded as expected.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A file or directory name the server would reject.
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// The log subscriber could not be installed.
    #[error("Logging error: {0}")]
    Logging(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(app_err.to_string().contains("file not found"));
    }

    #[test]
    fn terminal_error_display() {
        let err = AppError::Terminal("failed to enter raw mode".into());
        assert_eq!(err.to_string(), "Terminal error: failed to enter raw mode");
    }

    #[test]
    fn http_error_embeds_status_and_reason() {
        let err = AppError::Http {
            status: 404,
            reason: "Not Found".into(),
        };
        assert_eq!(err.to_string(), "Error: 404 Not Found");
    }

    #[test]
    fn decode_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let app_err: AppError = json_err.into();
        assert!(matches!(app_err, AppError::Decode(_)));
        assert!(app_err.to_string().starts_with("Decode error:"));
    }

    #[test]
    fn invalid_name_display() {
        let err = AppError::InvalidName("a/b".into());
        assert_eq!(err.to_string(), "Invalid name: a/b");
    }
}
