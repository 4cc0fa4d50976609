use serde::Serialize;
use serde_json::Value;

use crate::errors::{FailureKind, SendError};
use crate::transport::UploadResponse;

pub const DEFAULT_SUCCESS_MESSAGE: &str = "File uploaded successfully";
pub const TRANSPORT_FAILURE_MESSAGE: &str =
    "Could not reach the upload service. Check your connection and try again.";
const UNKNOWN_FAILURE_MESSAGE: &str = "Upload failed for an unknown reason. Please try again.";

/// How a submission ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum UploadOutcome {
    Success {
        message: String,
        server_file_id: Option<String>,
        extracted_data: Option<Value>,
    },
    Failure {
        kind: FailureKind,
        detail: String,
    },
}

impl UploadOutcome {
    /// Maps whatever the transport produced into exactly one outcome.
    /// Every message returned here is non-empty.
    pub fn from_send_result(result: Result<UploadResponse, SendError>) -> Self {
        match result {
            Ok(response) => Self::from_response(response),
            Err(err) => Self::classify(err),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success { .. })
    }

    /// The success message or the failure detail, whichever applies.
    pub fn message(&self) -> &str {
        match self {
            UploadOutcome::Success { message, .. } => message,
            UploadOutcome::Failure { detail, .. } => detail,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            UploadOutcome::Success { .. } => None,
            UploadOutcome::Failure { kind, .. } => Some(*kind),
        }
    }

    fn from_response(response: UploadResponse) -> Self {
        if !response.success {
            let detail = response
                .error
                .filter(|e| !e.trim().is_empty())
                .or_else(|| Some(response.message).filter(|m| !m.trim().is_empty()));
            return match detail {
                Some(detail) => UploadOutcome::Failure {
                    kind: FailureKind::ServerRejected,
                    detail,
                },
                None => UploadOutcome::Failure {
                    kind: FailureKind::UnknownError,
                    detail: UNKNOWN_FAILURE_MESSAGE.to_string(),
                },
            };
        }

        let message = if response.message.trim().is_empty() {
            DEFAULT_SUCCESS_MESSAGE.to_string()
        } else {
            response.message
        };
        let (server_file_id, extracted_data) = match response.data {
            Some(data) => (Some(data.file_id), data.extracted_data),
            None => (None, None),
        };

        UploadOutcome::Success {
            message,
            server_file_id,
            extracted_data,
        }
    }

    fn classify(err: SendError) -> Self {
        let (kind, detail) = match err {
            SendError::Status { status, body } => match structured_detail(&body) {
                Some(detail) => (FailureKind::ServerRejected, detail),
                None => (
                    FailureKind::UnknownError,
                    format!("Upload failed: the server responded with status {status}."),
                ),
            },
            SendError::Timeout | SendError::Connect(_) => (
                FailureKind::TransportError,
                TRANSPORT_FAILURE_MESSAGE.to_string(),
            ),
            SendError::Request(_) | SendError::Decode(_) => (
                FailureKind::UnknownError,
                UNKNOWN_FAILURE_MESSAGE.to_string(),
            ),
        };
        UploadOutcome::Failure { kind, detail }
    }
}

/// Pulls a human-readable detail out of an error body.
///
/// Recognised shapes, first match wins:
/// - `{"detail": "..."}`
/// - `{"detail": [{"msg": "..."}, ...]}` (messages joined with "; ")
/// - `{"error": "..."}` or `{"error": {"message": "..."}}`
/// - `{"message": "..."}`
fn structured_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    let detail = match value.get("detail") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Array(items)) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|i| i.get("msg").and_then(|m| m.as_str()))
                .collect();
            (!msgs.is_empty()).then(|| msgs.join("; "))
        }
        _ => None,
    };

    detail
        .or_else(|| match value.get("error") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Object(map)) => {
                map.get("message").and_then(|m| m.as_str()).map(String::from)
            }
            _ => None,
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .filter(|d| !d.trim().is_empty())
}
