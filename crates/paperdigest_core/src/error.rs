use thiserror::Error;

/// Bad or missing input, detected before any network call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no file or link was provided")]
    MissingInput,
    #[error("invalid link `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("file `{name}` is empty")]
    EmptyFile { name: String },
    #[error("cannot read file `{path}`: {reason}")]
    UnreadableFile { path: String, reason: String },
}

/// Failures the presentation layer has to show to the user.
///
/// Transient poll failures never reach this type; the poller logs them and
/// keeps going.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("submission failed: {message}")]
    Submission { message: String },
    #[error("job failed: {message}")]
    Terminal { message: String },
}

impl TrackerError {
    pub fn submission(message: impl Into<String>) -> Self {
        Self::Submission {
            message: message.into(),
        }
    }

    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }

    /// Validation and submission errors are one-shot; terminal errors stay on screen.
    pub fn is_persistent(&self) -> bool {
        matches!(self, TrackerError::Terminal { .. })
    }
}
