use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;

use crate::models::policy::{DEFAULT_MAX_BYTES, DOCX, PDF};
use crate::models::ValidationPolicy;

const DEFAULT_UPLOAD_PATH: &str = "/api/upload";
const DEFAULT_STATUS_PATH: &str = "/api/resumes/upload";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Uploader configuration loaded from environment variables.
/// Loading fails if any value present is malformed. The base URL may be
/// absent; only building a transport requires it.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub upload_path: String,
    pub status_path: String,
    pub policy: ValidationPolicy,
    pub request_timeout: Duration,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("UPLOAD_API_BASE_URL").filter(|v| !v.trim().is_empty());
        if let Some(url) = &api_base_url {
            Url::parse(url)
                .with_context(|| format!("UPLOAD_API_BASE_URL '{url}' is not a valid URL"))?;
        }

        let allowed = match lookup("ALLOWED_MEDIA_TYPES") {
            Some(raw) => parse_list(&raw),
            None => vec![PDF.to_string(), DOCX.to_string()],
        };
        let max_bytes = match lookup("MAX_UPLOAD_BYTES") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .context("MAX_UPLOAD_BYTES must be a whole number of bytes")?,
            None => DEFAULT_MAX_BYTES,
        };
        let policy =
            ValidationPolicy::new(allowed, max_bytes).context("Invalid upload policy")?;

        let timeout_secs = match lookup("UPLOAD_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .context("UPLOAD_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            api_base_url,
            upload_path: lookup("UPLOAD_PATH").unwrap_or_else(|| DEFAULT_UPLOAD_PATH.to_string()),
            status_path: lookup("UPLOAD_STATUS_PATH")
                .unwrap_or_else(|| DEFAULT_STATUS_PATH.to_string()),
            policy,
            request_timeout: Duration::from_secs(timeout_secs),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

/// Splits a comma-separated list, trimming each entry. An entry left blank
/// between two commas is kept so the policy can reject it.
fn parse_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim().trim_end_matches(',');
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split(',').map(|s| s.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("UPLOAD_API_BASE_URL", "http://localhost:8000")]).unwrap();
        assert_eq!(config.upload_path, "/api/upload");
        assert_eq!(config.status_path, "/api/resumes/upload");
        assert_eq!(config.policy, ValidationPolicy::default());
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.api_base_url.as_deref(), Some("http://localhost:8000"));
    }

    #[test]
    fn test_base_url_is_optional_for_policy_only_use() {
        let config = load(&[("MAX_UPLOAD_BYTES", "1048576")]).unwrap();
        assert_eq!(config.api_base_url, None);
        assert_eq!(config.policy.max_bytes(), 1024 * 1024);
    }

    #[test]
    fn test_blank_base_url_counts_as_missing() {
        let config = load(&[("UPLOAD_API_BASE_URL", "  ")]).unwrap();
        assert_eq!(config.api_base_url, None);
    }

    #[test]
    fn test_invalid_base_url_fails() {
        assert!(load(&[("UPLOAD_API_BASE_URL", "localhost without scheme")]).is_err());
    }

    #[test]
    fn test_custom_policy() {
        let config = load(&[
            ("UPLOAD_API_BASE_URL", "https://api.example.com"),
            ("ALLOWED_MEDIA_TYPES", " application/pdf , image/png "),
            ("MAX_UPLOAD_BYTES", "2097152"),
        ])
        .unwrap();
        assert_eq!(
            config.policy.allowed_media_types(),
            &["application/pdf", "image/png"]
        );
        assert_eq!(config.policy.max_bytes(), 2 * 1024 * 1024);
    }

    #[test]
    fn test_trailing_comma_in_type_list_is_tolerated() {
        let config = load(&[
            ("UPLOAD_API_BASE_URL", "https://api.example.com"),
            ("ALLOWED_MEDIA_TYPES", "application/pdf,"),
        ])
        .unwrap();
        assert_eq!(config.policy.allowed_media_types(), &["application/pdf"]);
    }

    #[test]
    fn test_malformed_policy_is_fatal() {
        for (key, value) in [
            ("ALLOWED_MEDIA_TYPES", ""),
            ("ALLOWED_MEDIA_TYPES", "application/pdf,,image/png"),
            ("MAX_UPLOAD_BYTES", "0"),
            ("MAX_UPLOAD_BYTES", "five megabytes"),
        ] {
            let result = load(&[("UPLOAD_API_BASE_URL", "http://localhost"), (key, value)]);
            assert!(result.is_err(), "{key}={value:?} should fail");
        }
    }

    #[test]
    fn test_custom_paths_and_timeout() {
        let config = load(&[
            ("UPLOAD_API_BASE_URL", "http://localhost:8000"),
            ("UPLOAD_PATH", "/api/resumes/upload"),
            ("UPLOAD_STATUS_PATH", "/v2/uploads"),
            ("UPLOAD_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(config.upload_path, "/api/resumes/upload");
        assert_eq!(config.status_path, "/v2/uploads");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
