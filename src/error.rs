//! Custom error types for the Bookdesk client
//!
//! This module defines the error type shared by the API client, the configuration
//! loader and the orchestrator. The orchestrator never lets these escape a user
//! action: they are turned into alerts on the view state instead.

use std::fmt;

/// Main error type for the Bookdesk client
#[derive(Debug)]
pub enum BookdeskError {
    /// The request could not be sent, or the body was not valid JSON
    Transport(reqwest::Error),

    /// The API answered with `success: false`
    Api(String),

    /// The API answered with `success: true` but without a `data` field
    MissingData(String),

    /// A configured or derived URL could not be parsed
    InvalidUrl(url::ParseError),

    /// Error occurred while reading configuration file
    ConfigRead(std::io::Error),

    /// Error occurred while parsing configuration
    ConfigParse(json5::Error),

    /// Generic error with a message
    Generic(String),
}

impl fmt::Display for BookdeskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookdeskError::Transport(e) => {
                write!(f, "Failed to reach the library server: {e}")
            }
            BookdeskError::Api(msg) => {
                write!(f, "Library server rejected the request: {msg}")
            }
            BookdeskError::MissingData(endpoint) => {
                write!(f, "Response from {endpoint} carried no data")
            }
            BookdeskError::InvalidUrl(e) => {
                write!(f, "Invalid URL: {e}")
            }
            BookdeskError::ConfigRead(e) => {
                write!(f, "Failed to read configuration file: {e}")
            }
            BookdeskError::ConfigParse(e) => {
                write!(f, "Failed to parse configuration: {e}")
            }
            BookdeskError::Generic(msg) => {
                write!(f, "Error: {msg}")
            }
        }
    }
}

impl std::error::Error for BookdeskError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BookdeskError::Transport(e) => Some(e),
            BookdeskError::InvalidUrl(e) => Some(e),
            BookdeskError::ConfigRead(e) => Some(e),
            BookdeskError::ConfigParse(e) => Some(e),
            BookdeskError::Api(_) | BookdeskError::MissingData(_) | BookdeskError::Generic(_) => {
                None
            }
        }
    }
}

impl From<reqwest::Error> for BookdeskError {
    fn from(error: reqwest::Error) -> Self {
        BookdeskError::Transport(error)
    }
}

impl From<url::ParseError> for BookdeskError {
    fn from(error: url::ParseError) -> Self {
        BookdeskError::InvalidUrl(error)
    }
}

impl From<std::io::Error> for BookdeskError {
    fn from(error: std::io::Error) -> Self {
        BookdeskError::ConfigRead(error)
    }
}

impl From<json5::Error> for BookdeskError {
    fn from(error: json5::Error) -> Self {
        BookdeskError::ConfigParse(error)
    }
}

impl From<&str> for BookdeskError {
    fn from(msg: &str) -> Self {
        BookdeskError::Generic(msg.to_string())
    }
}

impl From<String> for BookdeskError {
    fn from(msg: String) -> Self {
        BookdeskError::Generic(msg)
    }
}

/// Result type alias using our custom error type
pub type Result<T> = std::result::Result<T, BookdeskError>;
