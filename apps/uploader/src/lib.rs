//! Résumé intake and submission core.
//!
//! A user proposes a file (picker or drag-and-drop), the validator checks it
//! against the configured `ValidationPolicy`, and the `UploadController`
//! keeps it until an explicit submit sends it through a `Transport`.
//!
//! ```no_run
//! use std::sync::Arc;
//! use uploader::{CandidateFile, Config, HttpTransport, UploadController};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let transport = Arc::new(HttpTransport::from_config(&config)?);
//! let controller = UploadController::new(config.policy.clone(), transport);
//!
//! let file = CandidateFile::from_path("resume.pdf").await?;
//! if controller.on_file_selected(file).is_accepted() {
//!     let outcome = controller.submit().await?;
//!     println!("{}", outcome.message());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod intake;
pub mod models;
pub mod transport;

pub use config::Config;
pub use errors::{FailureKind, InvocationError, PolicyError, SendError, ValidationError};
pub use intake::{
    SelectionOrigin, SelectionOutcome, SessionStatus, SessionView, UploadController,
    UploadOutcome,
};
pub use models::{CandidateFile, ValidationPolicy};
pub use transport::{HttpTransport, Transport, UploadResponse};
