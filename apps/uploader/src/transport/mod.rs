//! Transport: the one capability the intake core needs from the outside world:
//! send a single file and report what the upload service said.
//!
//! `UploadController` holds an `Arc<dyn Transport>`; production code passes
//! `HttpTransport`, tests pass a double that returns canned results.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::SendError;
use crate::models::CandidateFile;

pub mod http;

pub use http::HttpTransport;

/// JSON body the upload service returns for uploads and status polls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<UploadData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadData {
    pub file_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_data: Option<Value>,
}

/// Sends one file to the upload service.
///
/// Implementations return `Ok` for any 2xx response whose body decodes as an
/// `UploadResponse` (even one with `success: false`) and `Err` otherwise.
/// Classification into user-facing failures happens in the intake core.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, file: &CandidateFile) -> Result<UploadResponse, SendError>;
}
