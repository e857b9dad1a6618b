use thiserror::Error;

/// Failures the menus know how to report.
/// Repositories return `anyhow::Result` and raise these so callers can `downcast_ref` them.
#[derive(Debug, Error)]
pub enum EhsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("worker {0} not found")]
    WorkerNotFound(i32),
    #[error("user {0} not found")]
    UserNotFound(i32),
    #[error("task {0} not found")]
    TaskNotFound(i32),
    #[error("rule {0} not found")]
    RuleNotFound(i32),
    #[error("user {0} already exists")]
    DuplicateUser(String),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("store error: {0}")]
    Store(String),
    #[error("unable to save media {path}: {reason}")]
    MediaCopy { path: String, reason: String },
    #[error("report for task {0} was cancelled")]
    Cancelled(i32),
}

impl EhsError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        EhsError::InvalidInput(msg.into())
    }

    /// True for errors that only ask the user to type something else
    pub fn is_input_error(&self) -> bool {
        matches!(self, EhsError::InvalidInput(_))
    }
}

/// Look up the domain error behind an `anyhow::Error`, if there is one
pub fn ehs_error(err: &anyhow::Error) -> Option<&EhsError> {
    err.downcast_ref::<EhsError>()
}
