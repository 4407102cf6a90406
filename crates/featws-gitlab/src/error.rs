//! Error types for featws-gitlab

/// Result type for featws-gitlab operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to the GitLab API
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level HTTP failure
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The configured token is not a valid header value
    #[error("Invalid GitLab token")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),

    /// Non-404 API failure
    #[error("GitLab API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The requested resource does not exist
    #[error("GitLab resource not found: {resource}")]
    NotFound { resource: String },

    /// Repository file content was not valid base64
    #[error("Invalid base64 file content: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Repository file content was not valid UTF-8
    #[error("File content is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// True when the error is the distinguishable not-found status
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
