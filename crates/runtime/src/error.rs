//! Runtime error types.

use skirmish_core::TurnError;

/// Failures surfaced by [`crate::SessionHandle`].
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The session worker has exited (encounter over or handle dropped).
    #[error("session has ended")]
    SessionClosed,

    /// An action is already resolving; the submission was dropped.
    #[error("an action is already resolving")]
    Busy,

    /// The engine refused the submission.
    #[error(transparent)]
    Turn(#[from] TurnError),
}
