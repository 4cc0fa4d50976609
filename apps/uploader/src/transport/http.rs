//! HttpTransport: the reqwest-backed `Transport` that talks to the résumé
//! upload service.
//!
//! One attempt per call: no retries, no backoff. Timeouts are whatever the
//! configured client timeout enforces.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, Url};
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::SendError;
use crate::models::CandidateFile;
use crate::transport::{Transport, UploadResponse};

/// Name of the multipart field the service reads the file from.
const FILE_FIELD: &str = "file";

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    upload_path: String,
    status_path: String,
}

impl HttpTransport {
    pub fn new(
        base_url: &str,
        upload_path: &str,
        status_path: &str,
        timeout: Duration,
    ) -> Result<Self> {
        Url::parse(base_url).with_context(|| format!("Invalid upload base URL '{base_url}'"))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            upload_path: upload_path.to_string(),
            status_path: status_path.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config
            .api_base_url
            .as_deref()
            .context("Required environment variable 'UPLOAD_API_BASE_URL' is not set")?;
        Self::new(
            base_url,
            &config.upload_path,
            &config.status_path,
            config.request_timeout,
        )
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `<status-path>/{file_id}/status`, with `file_id` percent-encoded as a
    /// single path segment.
    fn status_url(&self, file_id: &str) -> Result<Url, SendError> {
        let mut url = Url::parse(&self.endpoint(&self.status_path))
            .map_err(|e| SendError::Request(e.to_string()))?;
        let base = url.to_string();
        url.path_segments_mut()
            .map_err(|_| SendError::Request(format!("Cannot append path to '{base}'")))?
            .pop_if_empty()
            .push(file_id)
            .push("status");
        Ok(url)
    }

    /// GET the status of an earlier upload. Same response shape as an upload.
    pub async fn fetch_status(&self, file_id: &str) -> Result<UploadResponse, SendError> {
        let url = self.status_url(file_id)?;
        debug!(%url, "Polling upload status");

        let response = self.client.get(url).send().await?;
        read_response(response).await
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, file: &CandidateFile) -> Result<UploadResponse, SendError> {
        let part = Part::bytes(file.content().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.media_type())
            .map_err(|e| SendError::Request(e.to_string()))?;
        let form = Form::new().part(FILE_FIELD, part);

        let url = self.endpoint(&self.upload_path);
        debug!(%url, name = file.name(), "Sending multipart upload");

        let response = self.client.post(&url).multipart(form).send().await?;
        read_response(response).await
    }
}

async fn read_response(response: Response) -> Result<UploadResponse, SendError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        warn!("Upload service returned {}: {}", status, body);
        return Err(SendError::Status {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| SendError::Decode(e.to_string()))
}
