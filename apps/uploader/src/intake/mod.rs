// File intake pipeline: validation, session state, submission.
// Network I/O only ever happens inside `UploadController::submit`, through the
// injected `Transport`.

pub mod controller;
pub mod outcome;
pub mod session;
pub mod validation;

pub use controller::{SelectionOrigin, SelectionOutcome, UploadController};
pub use outcome::UploadOutcome;
pub use session::{SessionStatus, SessionView, UploadSession};
pub use validation::{check, ValidationResult};
