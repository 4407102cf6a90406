//! Error types for featws-store

/// Result type for featws-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in featws-store operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database failure
    #[error(transparent)]
    Sql(#[from] sqlx::Error),

    /// A list/count filter referenced an unknown field or carried an
    /// unparseable value
    #[error("Invalid filter field: {field}")]
    InvalidFilter { field: String },
}

impl Error {
    /// True when the error should map to a bad-request at the boundary
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Error::InvalidFilter { .. })
    }
}
