use serde::Serialize;
use uuid::Uuid;

use crate::errors::InvocationError;
use crate::intake::outcome::UploadOutcome;
use crate::models::CandidateFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionStatus {
    Idle,
    Ready,
    Submitting,
    Succeeded,
    Failed,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Succeeded | SessionStatus::Failed)
    }
}

/// Lifecycle record of one selection-through-submission attempt.
///
/// A new selection replaces the whole session; only the submit path moves an
/// existing session forward (`Ready → Submitting → Succeeded | Failed`).
#[derive(Debug, Clone)]
pub struct UploadSession {
    id: Uuid,
    selected_file: Option<CandidateFile>,
    status: SessionStatus,
    last_error: Option<String>,
    outcome: Option<UploadOutcome>,
}

impl UploadSession {
    pub fn idle() -> Self {
        Self {
            id: Uuid::new_v4(),
            selected_file: None,
            status: SessionStatus::Idle,
            last_error: None,
            outcome: None,
        }
    }

    pub fn ready(file: CandidateFile) -> Self {
        Self {
            id: Uuid::new_v4(),
            selected_file: Some(file),
            status: SessionStatus::Ready,
            last_error: None,
            outcome: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn selected_file(&self) -> Option<&CandidateFile> {
        self.selected_file.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn outcome(&self) -> Option<&UploadOutcome> {
        self.outcome.as_ref()
    }

    /// Moves `Ready → Submitting` and hands back the file to send.
    pub(crate) fn begin_submit(&mut self) -> Result<CandidateFile, InvocationError> {
        match self.status {
            SessionStatus::Ready => {
                let file = self
                    .selected_file
                    .clone()
                    .ok_or(InvocationError::NoFileSelected)?;
                self.status = SessionStatus::Submitting;
                Ok(file)
            }
            SessionStatus::Idle => Err(InvocationError::NoFileSelected),
            SessionStatus::Submitting => Err(InvocationError::SubmissionInFlight),
            SessionStatus::Succeeded | SessionStatus::Failed => {
                Err(InvocationError::SessionFinished)
            }
        }
    }

    /// Applies the terminal outcome in one step.
    pub(crate) fn finish(&mut self, outcome: UploadOutcome) {
        match &outcome {
            UploadOutcome::Success { .. } => {
                self.status = SessionStatus::Succeeded;
                self.last_error = None;
            }
            UploadOutcome::Failure { detail, .. } => {
                self.status = SessionStatus::Failed;
                self.last_error = Some(detail.clone());
            }
        }
        self.outcome = Some(outcome);
    }

    pub fn view(&self) -> SessionView {
        let message = match &self.outcome {
            Some(UploadOutcome::Success { message, .. }) => Some(message.clone()),
            _ => None,
        };

        SessionView {
            status: self.status,
            file_name: self.selected_file.as_ref().map(|f| f.name().to_string()),
            file_size_bytes: self.selected_file.as_ref().map(|f| f.byte_size()),
            file_size_mb: self.selected_file.as_ref().map(|f| f.size_mb()),
            message,
            error: self.last_error.clone(),
        }
    }
}

/// Everything a front end needs to render the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub status: SessionStatus,
    pub file_name: Option<String>,
    pub file_size_bytes: Option<u64>,
    pub file_size_mb: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FailureKind;
    use crate::models::policy::PDF;

    fn pdf() -> CandidateFile {
        CandidateFile::new("cv.pdf", PDF, vec![0u8; 1024 * 1024])
    }

    #[test]
    fn test_idle_has_nothing_selected() {
        let session = UploadSession::idle();
        assert_eq!(session.status(), SessionStatus::Idle);
        assert!(session.selected_file().is_none());
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_new_sessions_get_distinct_ids() {
        assert_ne!(UploadSession::idle().id(), UploadSession::idle().id());
    }

    #[test]
    fn test_begin_submit_from_ready() {
        let mut session = UploadSession::ready(pdf());
        let file = session.begin_submit().unwrap();
        assert_eq!(file.name(), "cv.pdf");
        assert_eq!(session.status(), SessionStatus::Submitting);
    }

    #[test]
    fn test_begin_submit_refusals() {
        let mut idle = UploadSession::idle();
        assert_eq!(idle.begin_submit(), Err(InvocationError::NoFileSelected));

        let mut in_flight = UploadSession::ready(pdf());
        in_flight.begin_submit().unwrap();
        assert_eq!(
            in_flight.begin_submit(),
            Err(InvocationError::SubmissionInFlight)
        );

        in_flight.finish(UploadOutcome::Success {
            message: "ok".to_string(),
            server_file_id: None,
            extracted_data: None,
        });
        assert_eq!(
            in_flight.begin_submit(),
            Err(InvocationError::SessionFinished)
        );
    }

    #[test]
    fn test_finish_failure_records_error() {
        let mut session = UploadSession::ready(pdf());
        session.begin_submit().unwrap();
        session.finish(UploadOutcome::Failure {
            kind: FailureKind::ServerRejected,
            detail: "Invalid PDF signature".to_string(),
        });
        assert_eq!(session.status(), SessionStatus::Failed);
        assert!(session.status().is_terminal());
        assert_eq!(session.last_error(), Some("Invalid PDF signature"));
        assert!(session.outcome().is_some());
    }

    #[test]
    fn test_view_after_success() {
        let mut session = UploadSession::ready(pdf());
        session.begin_submit().unwrap();
        session.finish(UploadOutcome::Success {
            message: "Upload complete".to_string(),
            server_file_id: Some("9".to_string()),
            extracted_data: None,
        });

        let view = session.view();
        assert_eq!(view.status, SessionStatus::Succeeded);
        assert_eq!(view.file_name.as_deref(), Some("cv.pdf"));
        assert_eq!(view.file_size_bytes, Some(1024 * 1024));
        assert_eq!(view.file_size_mb.as_deref(), Some("1.00"));
        assert_eq!(view.message.as_deref(), Some("Upload complete"));
        assert!(view.error.is_none());
    }
}
