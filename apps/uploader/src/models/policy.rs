use crate::errors::PolicyError;

pub const PDF: &str = "application/pdf";
pub const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const DOC: &str = "application/msword";
pub const PNG: &str = "image/png";
pub const JPEG: &str = "image/jpeg";
pub const TXT: &str = "text/plain";

/// 5 MB, matching the upload service's own ceiling.
pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Allow-list and size ceiling every proposed file is checked against.
///
/// Built once at startup and passed explicitly to whoever validates; it is
/// never read from global state and never changes after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    allowed_media_types: Vec<String>,
    max_bytes: u64,
}

impl ValidationPolicy {
    /// Builds a policy, keeping the first occurrence of each media type in
    /// the order given. Entries are compared verbatim (case-sensitive).
    pub fn new<I, S>(allowed_media_types: I, max_bytes: u64) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut allowed: Vec<String> = Vec::new();
        for media_type in allowed_media_types {
            let media_type = media_type.into();
            if media_type.trim().is_empty() {
                return Err(PolicyError::BlankMediaType);
            }
            if !allowed.contains(&media_type) {
                allowed.push(media_type);
            }
        }

        if allowed.is_empty() {
            return Err(PolicyError::EmptyAllowList);
        }
        if max_bytes == 0 {
            return Err(PolicyError::ZeroLimit);
        }

        Ok(Self {
            allowed_media_types: allowed,
            max_bytes,
        })
    }

    pub fn allowed_media_types(&self) -> &[String] {
        &self.allowed_media_types
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Exact membership test; no wildcards, no case folding.
    pub fn allows(&self, media_type: &str) -> bool {
        self.allowed_media_types.iter().any(|t| t == media_type)
    }
}

impl Default for ValidationPolicy {
    /// PDF and DOCX up to 5 MB.
    fn default() -> Self {
        Self {
            allowed_media_types: vec![PDF.to_string(), DOCX.to_string()],
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

/// Short display label for the media types résumés usually come in.
/// Anything else is shown as its raw identifier.
pub fn media_type_label(media_type: &str) -> &str {
    match media_type {
        PDF => "PDF",
        DOCX => "DOCX",
        DOC => "DOC",
        PNG => "PNG",
        JPEG => "JPEG",
        TXT => "TXT",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_is_pdf_and_docx_5mb() {
        let policy = ValidationPolicy::default();
        assert_eq!(policy.allowed_media_types(), &[PDF, DOCX]);
        assert_eq!(policy.max_bytes(), 5_242_880);
    }

    #[test]
    fn test_new_preserves_order_and_drops_duplicates() {
        let policy = ValidationPolicy::new([DOCX, PDF, DOCX], 1024).unwrap();
        assert_eq!(policy.allowed_media_types(), &[DOCX, PDF]);
    }

    #[test]
    fn test_new_rejects_empty_list() {
        let empty: Vec<String> = vec![];
        assert_eq!(
            ValidationPolicy::new(empty, 1024),
            Err(PolicyError::EmptyAllowList)
        );
    }

    #[test]
    fn test_new_rejects_blank_entry() {
        assert_eq!(
            ValidationPolicy::new([PDF, "  "], 1024),
            Err(PolicyError::BlankMediaType)
        );
    }

    #[test]
    fn test_new_rejects_zero_limit() {
        assert_eq!(
            ValidationPolicy::new([PDF], 0),
            Err(PolicyError::ZeroLimit)
        );
    }

    #[test]
    fn test_allows_is_case_sensitive() {
        let policy = ValidationPolicy::default();
        assert!(policy.allows(PDF));
        assert!(!policy.allows("Application/PDF"));
        assert!(!policy.allows("application/*"));
    }

    #[test]
    fn test_labels() {
        assert_eq!(media_type_label(PDF), "PDF");
        assert_eq!(media_type_label(DOCX), "DOCX");
        assert_eq!(media_type_label("application/rtf"), "application/rtf");
    }
}
