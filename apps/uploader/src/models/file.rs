use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;
use chrono::{DateTime, Utc};

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";
const FALLBACK_FILE_NAME: &str = "upload.bin";

/// A file proposed by the user, captured once from a picker or drop event.
/// Fields are read-only after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    name: String,
    byte_size: u64,
    media_type: String,
    last_modified: DateTime<Utc>,
    content: Bytes,
}

impl CandidateFile {
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            byte_size: content.len() as u64,
            media_type: media_type.into(),
            last_modified: Utc::now(),
            content,
        }
    }

    pub fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
        self.last_modified = last_modified;
        self
    }

    /// Reads a file from disk. The media type is guessed from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        let metadata = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Failed to stat '{}'", path.display()))?;

        let last_modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(FALLBACK_FILE_NAME);
        let media_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or(FALLBACK_MEDIA_TYPE);

        Ok(Self::new(name, media_type, content).with_last_modified(last_modified))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn byte_size(&self) -> u64 {
        self.byte_size
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Size in megabytes with two decimals, e.g. "2.41".
    pub fn size_mb(&self) -> String {
        format!("{:.2}", self.byte_size as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use crate::models::policy::{DOCX, PDF};

    #[test]
    fn test_size_is_taken_from_content() {
        let file = CandidateFile::new("cv.pdf", PDF, vec![0u8; 2048]);
        assert_eq!(file.byte_size(), 2048);
        assert_eq!(file.name(), "cv.pdf");
        assert_eq!(file.media_type(), PDF);
    }

    #[test]
    fn test_size_mb_two_decimals() {
        let file = CandidateFile::new("cv.pdf", PDF, vec![0u8; 3 * 1024 * 1024 / 2]);
        assert_eq!(file.size_mb(), "1.50");
    }

    #[tokio::test]
    async fn test_from_path_guesses_pdf() {
        let mut tmp = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        tmp.write_all(b"%PDF-1.7 test").unwrap();

        let file = CandidateFile::from_path(tmp.path()).await.unwrap();
        assert_eq!(file.media_type(), PDF);
        assert_eq!(file.byte_size(), 13);
        assert!(file.name().ends_with(".pdf"));
        assert_eq!(file.content().as_ref(), b"%PDF-1.7 test");
    }

    #[tokio::test]
    async fn test_from_path_guesses_docx() {
        let tmp = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        let file = CandidateFile::from_path(tmp.path()).await.unwrap();
        assert_eq!(file.media_type(), DOCX);
        assert_eq!(file.byte_size(), 0);
    }

    #[tokio::test]
    async fn test_from_path_unknown_extension_is_octet_stream() {
        let tmp = tempfile::Builder::new()
            .suffix(".zzunknown")
            .tempfile()
            .unwrap();
        let file = CandidateFile::from_path(tmp.path()).await.unwrap();
        assert_eq!(file.media_type(), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_from_path_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = CandidateFile::from_path(dir.path().join("missing.pdf")).await;
        assert!(result.is_err());
    }
}
