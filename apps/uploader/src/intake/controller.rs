//! UploadController: owns the session state machine and mediates between
//! UI events, the validator, and the transport.
//!
//! ```text
//! Idle ──select(ok)──▶ Ready ──submit──▶ Submitting ──▶ Succeeded | Failed
//!                                                            │
//! Idle ◀──────────── select(bad) ────────────────────────────┤
//! Ready ◀─────────── select(ok) ─────────────────────────────┘
//! ```
//!
//! The session lives behind a mutex that is never held across an `.await`.
//! `submit` flips the status to `Submitting` under the lock, so a second call
//! observes it and returns without touching the transport.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::errors::{FailureKind, InvocationError, ValidationError};
use crate::intake::outcome::UploadOutcome;
use crate::intake::session::{SessionStatus, SessionView, UploadSession};
use crate::intake::validation::{check, ValidationResult};
use crate::models::{CandidateFile, ValidationPolicy};
use crate::transport::Transport;

const INTERRUPTED_MESSAGE: &str = "The upload was interrupted before it completed.";

/// Where a proposed file came from. Both origins go through the same path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOrigin {
    Picker,
    Drop,
}

/// What the front end should show after a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// Stored as the current selection; nothing to display.
    Accepted,
    Rejected(ValidationError),
    /// The event carried no file.
    Ignored,
    /// A submission is in flight; the selection was not applied.
    Busy,
}

impl SelectionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SelectionOutcome::Accepted)
    }

    /// Message to display, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            SelectionOutcome::Rejected(reason) => Some(reason.to_string()),
            SelectionOutcome::Busy => Some(InvocationError::SubmissionInFlight.to_string()),
            SelectionOutcome::Accepted | SelectionOutcome::Ignored => None,
        }
    }
}

pub struct UploadController {
    policy: ValidationPolicy,
    transport: Arc<dyn Transport>,
    session: Mutex<UploadSession>,
}

impl UploadController {
    pub fn new(policy: ValidationPolicy, transport: Arc<dyn Transport>) -> Self {
        Self {
            policy,
            transport,
            session: Mutex::new(UploadSession::idle()),
        }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Entry point for picker and drop events. Only the first file is used;
    /// an empty list changes nothing.
    pub fn on_files_proposed<I>(&self, origin: SelectionOrigin, files: I) -> SelectionOutcome
    where
        I: IntoIterator<Item = CandidateFile>,
    {
        match files.into_iter().next() {
            Some(file) => {
                debug!(?origin, "File proposed");
                self.on_file_selected(file)
            }
            None => {
                debug!(?origin, "Empty selection ignored");
                SelectionOutcome::Ignored
            }
        }
    }

    /// Validates `file` and, if accepted, makes it the current selection in a
    /// fresh `Ready` session. A rejected file is never stored: an earlier
    /// selection in `Idle` or `Ready` is kept, while a finished session is
    /// reset to `Idle`.
    pub fn on_file_selected(&self, file: CandidateFile) -> SelectionOutcome {
        info!(
            name = file.name(),
            size_bytes = file.byte_size(),
            size_mb = %file.size_mb(),
            media_type = file.media_type(),
            last_modified = %file.last_modified(),
            "File selected"
        );

        let verdict = check(&file, &self.policy);

        let mut session = self.session.lock();
        if session.status() == SessionStatus::Submitting {
            warn!(session_id = %session.id(), "Selection refused while an upload is in flight");
            return SelectionOutcome::Busy;
        }

        match verdict {
            ValidationResult::Accepted => {
                *session = UploadSession::ready(file);
                debug!(session_id = %session.id(), "Session ready");
                SelectionOutcome::Accepted
            }
            ValidationResult::Rejected { reason } => {
                warn!(name = file.name(), %reason, "File rejected");
                if session.status().is_terminal() {
                    *session = UploadSession::idle();
                }
                SelectionOutcome::Rejected(reason)
            }
        }
    }

    /// Sends the selected file. Fails fast, without calling the transport,
    /// when nothing is selected, an upload is in flight, or the session has
    /// already finished. Otherwise the transport is called exactly once and
    /// its result becomes the session's terminal state.
    pub async fn submit(&self) -> Result<UploadOutcome, InvocationError> {
        let (file, session_id) = {
            let mut session = self.session.lock();
            match session.begin_submit() {
                Ok(file) => (file, session.id()),
                Err(err) => {
                    warn!(session_id = %session.id(), status = ?session.status(), %err, "Submit refused");
                    return Err(err);
                }
            }
        };

        info!(
            %session_id,
            name = file.name(),
            size_bytes = file.byte_size(),
            "Upload started"
        );

        let mut guard = InFlight {
            session: &self.session,
            armed: true,
        };
        let result = self.transport.send(&file).await;
        guard.armed = false;

        let outcome = UploadOutcome::from_send_result(result);
        match &outcome {
            UploadOutcome::Success { server_file_id, .. } => {
                info!(%session_id, server_file_id = ?server_file_id, "Upload succeeded");
            }
            UploadOutcome::Failure { kind, detail } => {
                warn!(%session_id, kind = kind.code(), %detail, "Upload failed");
            }
        }

        self.session.lock().finish(outcome.clone());
        Ok(outcome)
    }

    pub fn current_status(&self) -> SessionStatus {
        self.session.lock().status()
    }

    pub fn current_error(&self) -> Option<String> {
        self.session.lock().last_error().map(String::from)
    }

    pub fn selected_file(&self) -> Option<CandidateFile> {
        self.session.lock().selected_file().cloned()
    }

    pub fn view(&self) -> SessionView {
        self.session.lock().view()
    }
}

/// Marks the session `Failed` if a `submit` future is dropped mid-flight,
/// so the session can never stay in `Submitting`.
struct InFlight<'a> {
    session: &'a Mutex<UploadSession>,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut session = self.session.lock();
        if session.status() == SessionStatus::Submitting {
            warn!(session_id = %session.id(), "Upload interrupted");
            session.finish(UploadOutcome::Failure {
                kind: FailureKind::UnknownError,
                detail: INTERRUPTED_MESSAGE.to_string(),
            });
        }
    }
}
