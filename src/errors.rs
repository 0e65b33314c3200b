//! # Error Types Module
//!
//! This module defines the error type shared by the image preprocessor, the
//! vision API client and the background task that runs them.

/// Errors raised while turning a photo into an answer
#[derive(Debug, Clone)]
pub enum VisionError {
    /// Photo bytes could not be decoded or re-encoded
    Decode(String),
    /// Transport-level failure talking to the API
    Http(String),
    /// API answered with a non-success status
    Status { status: u16, body: String },
    /// API body did not carry `choices[0].message.content`
    MalformedResponse(String),
    /// Background task panicked or was aborted
    Task(String),
}

impl std::fmt::Display for VisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisionError::Decode(msg) => write!(f, "Image decode error: {msg}"),
            VisionError::Http(msg) => write!(f, "HTTP error: {msg}"),
            VisionError::Status { status, body } => {
                write!(f, "API returned status {status}: {body}")
            }
            VisionError::MalformedResponse(msg) => write!(f, "Malformed API response: {msg}"),
            VisionError::Task(msg) => write!(f, "Background task error: {msg}"),
        }
    }
}

impl std::error::Error for VisionError {}

impl From<image::ImageError> for VisionError {
    fn from(err: image::ImageError) -> Self {
        VisionError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for VisionError {
    fn from(err: reqwest::Error) -> Self {
        VisionError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for VisionError {
    fn from(err: serde_json::Error) -> Self {
        VisionError::MalformedResponse(err.to_string())
    }
}

impl From<tokio::task::JoinError> for VisionError {
    fn from(err: tokio::task::JoinError) -> Self {
        VisionError::Task(err.to_string())
    }
}
