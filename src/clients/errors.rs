use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort a checker run.
#[derive(Error, Debug)]
pub enum Error {
    /// The endpoint answered with a status other than the one the contract requires
    #[error("{method} {path} failed with status {actual} (expected {expected})")]
    UnexpectedStatus {
        /// HTTP method of the offending request
        method: Method,
        /// Path relative to the base URL
        path: String,
        /// Status required by the contract
        expected: StatusCode,
        /// Status the server sent
        actual: StatusCode,
    },

    /// The status was right but the body broke the contract
    #[error("{method} {path} (status {status}): {reason}")]
    ContractViolation {
        /// HTTP method of the offending request
        method: Method,
        /// Path relative to the base URL
        path: String,
        /// Status the server sent
        status: StatusCode,
        /// What was wrong with the body
        reason: String,
    },

    /// The body could not be decoded into the expected shape
    #[error("{method} {path} (status {status}): unexpected response body: {source}")]
    Decode {
        /// HTTP method of the offending request
        method: Method,
        /// Path relative to the base URL
        path: String,
        /// Status the server sent
        status: StatusCode,
        /// Underlying decoder error
        source: serde_json::Error,
    },

    /// Connection refused, timeout, or any other failure below HTTP
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Progress output could not be written
    #[error("Failed to write progress: {0}")]
    Output(#[from] std::io::Error),

    /// Invalid startup configuration
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}
