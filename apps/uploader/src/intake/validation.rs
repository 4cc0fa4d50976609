use crate::errors::ValidationError;
use crate::models::{CandidateFile, ValidationPolicy};

/// Verdict on a proposed file. Exactly one variant applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Accepted,
    Rejected { reason: ValidationError },
}

impl ValidationResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationResult::Accepted)
    }

    pub fn reason(&self) -> Option<&ValidationError> {
        match self {
            ValidationResult::Accepted => None,
            ValidationResult::Rejected { reason } => Some(reason),
        }
    }
}

/// Decides whether `file` may proceed under `policy`.
///
/// Checks run in a fixed order:
/// 1. media type must be an exact member of the allow-list
/// 2. byte size must be `<= max_bytes` (a file exactly at the limit passes)
///
/// Pure: no I/O, no state, same answer for the same inputs.
pub fn check(file: &CandidateFile, policy: &ValidationPolicy) -> ValidationResult {
    if !policy.allows(file.media_type()) {
        return ValidationResult::Rejected {
            reason: ValidationError::UnsupportedMediaType {
                media_type: file.media_type().to_string(),
                allowed: policy.allowed_media_types().to_vec(),
            },
        };
    }

    if file.byte_size() > policy.max_bytes() {
        return ValidationResult::Rejected {
            reason: ValidationError::TooLarge {
                byte_size: file.byte_size(),
                max_bytes: policy.max_bytes(),
            },
        };
    }

    ValidationResult::Accepted
}
