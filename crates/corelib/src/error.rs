//! Error types for the core library.

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Lookup on a ring with no registered servers.
    #[error("no server registered on the ring")]
    NoServer,
    /// Ring configuration rejected at construction.
    #[error("invalid ring configuration: {0}")]
    InvalidConfig(String),
}
