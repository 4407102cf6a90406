//! Error types for featws-rules

/// Result type for featws-rules operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing legacy rule text
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A section header line is not properly bracketed
    #[error("Malformed section header at line {line}: {header}")]
    MalformedHeader { line: usize, header: String },
}
