//! Error types for featws-core

/// Result type for featws-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in featws-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required fields missing or malformed on an inbound payload
    #[error("Validation failed on: {}", fields.join(", "))]
    Validation { fields: Vec<String> },

    /// Resource does not exist
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// The persisted VERSION file is not a decimal integer
    #[error("Invalid VERSION content: {content:?}")]
    InvalidVersion { content: String },

    // Transparent wrappers for underlying crate errors
    /// Rule parsing/normalization error from featws-rules
    #[error(transparent)]
    Rules(#[from] featws_rules::Error),

    /// Remote repository error from featws-gitlab
    #[error(transparent)]
    Gitlab(#[from] featws_gitlab::Error),

    /// Persistence error from featws-store
    #[error(transparent)]
    Store(#[from] featws_store::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Convenience constructor for single-field validation failures
    pub fn validation(field: impl Into<String>) -> Self {
        Error::Validation {
            fields: vec![field.into()],
        }
    }

    /// True when the error maps to a bad-request at the boundary
    pub fn is_bad_request(&self) -> bool {
        match self {
            Error::Validation { .. } => true,
            Error::Store(e) => e.is_bad_request(),
            _ => false,
        }
    }

    /// True when the error maps to not-found at the boundary
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
