use serde::Serialize;
use thiserror::Error;

use crate::models::policy::media_type_label;

/// Why a proposed file was refused before it could reach the transport.
/// The `Display` output is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid file type. Allowed types: {}.", describe_types(.allowed))]
    UnsupportedMediaType {
        media_type: String,
        allowed: Vec<String>,
    },

    #[error("File is too large. Maximum allowed size is {}MB.", format_megabytes(.max_bytes))]
    TooLarge { byte_size: u64, max_bytes: u64 },
}

/// A `submit` call that could not start. Resolved locally; no request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvocationError {
    #[error("Select a file before uploading.")]
    NoFileSelected,

    #[error("An upload is already in progress.")]
    SubmissionInFlight,

    #[error("This upload has already finished. Select a file to upload again.")]
    SessionFinished,
}

/// Raw failure reported by a `Transport`. The intake core classifies these
/// into a `FailureKind` before anything is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("upload service responded with status {status}")]
    Status { status: u16, body: String },

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("could not decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for SendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SendError::Timeout
        } else if err.is_connect() {
            SendError::Connect(err.to_string())
        } else if err.is_decode() {
            SendError::Decode(err.to_string())
        } else {
            SendError::Request(err.to_string())
        }
    }
}

/// A policy that cannot be used. Raised once, while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("allowed media type list is empty")]
    EmptyAllowList,

    #[error("allowed media type list contains a blank entry")]
    BlankMediaType,

    #[error("maximum upload size must be greater than zero")]
    ZeroLimit,
}

/// Terminal failure classes a submission can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    /// The server answered with a structured detail message.
    ServerRejected,
    /// Network failure or timeout.
    TransportError,
    UnknownError,
}

impl FailureKind {
    pub fn code(&self) -> &'static str {
        match self {
            FailureKind::ServerRejected => "SERVER_REJECTED",
            FailureKind::TransportError => "TRANSPORT_ERROR",
            FailureKind::UnknownError => "UNKNOWN_ERROR",
        }
    }
}

fn describe_types(types: &[String]) -> String {
    types
        .iter()
        .map(|t| media_type_label(t))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Whole megabytes, halves rounded up (2.5 MB prints as 3).
fn format_megabytes(bytes: &u64) -> String {
    format!("{:.0}", (*bytes as f64 / (1024.0 * 1024.0)).round())
}
