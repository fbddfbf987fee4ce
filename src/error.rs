//! Error types for content negotiation

use thiserror::Error;

/// Errors surfaced by the negotiation middleware and its collaborators
#[derive(Error, Debug)]
pub enum Error {
    /// Setup-time configuration error, such as an empty media catalog
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown key passed to the process-wide option setter
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    /// Serialization error from a response body helper
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error from a request body helper
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Failure raised by a downstream handler in the middleware chain
    #[error("Internal error: {0}")]
    Internal(String),
}
