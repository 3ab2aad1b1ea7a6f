use std::fmt;

use paperdigest_core::{JobSnapshot, JobStatus, SubmissionId, TrackerError, ValidationError};

pub type JobId = String;

/// A unit of work handed to the submission gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitInput {
    File { file_name: String, bytes: Vec<u8> },
    Link(String),
}

impl SubmitInput {
    /// Generic message shown when the backend gives no reason of its own.
    pub(crate) fn failure_message(&self) -> &'static str {
        match self {
            SubmitInput::File { .. } => "Upload failed",
            SubmitInput::Link(_) => "Link submission failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Submitted {
        submission: SubmissionId,
        result: Result<JobSnapshot, ApiError>,
    },
    StatusUpdate {
        job_id: JobId,
        job: JobSnapshot,
    },
    PollExpired {
        job_id: JobId,
    },
}

/// One row of the job list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSummary {
    pub id: Option<JobId>,
    pub status: JobStatus,
    pub status_label: Option<String>,
    pub progress: Option<u8>,
    pub error_message: Option<String>,
    pub source_type: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn validation(error: ValidationError) -> Self {
        let message = error.to_string();
        Self::new(FailureKind::Validation(error), message)
    }

    /// Maps a gateway failure onto the controller's error taxonomy.
    pub fn into_tracker_error(self) -> TrackerError {
        match self.kind {
            FailureKind::Validation(error) => TrackerError::Validation(error),
            _ => TrackerError::submission(self.message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Validation(ValidationError),
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Validation(_) => write!(f, "invalid input"),
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
