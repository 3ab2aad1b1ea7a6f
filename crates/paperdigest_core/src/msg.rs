use std::path::PathBuf;

use crate::{JobSnapshot, SubmissionId, TrackerError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User pasted a link and asked for it to be processed.
    LinkSubmitted(String),
    /// User picked a file for upload.
    FileSubmitted(PathBuf),
    /// Gateway answered a submission; the payload may lack an id.
    SubmissionSucceeded {
        submission: SubmissionId,
        job: JobSnapshot,
    },
    /// Gateway rejected the input or the backend could not be reached.
    SubmissionFailed {
        submission: SubmissionId,
        error: TrackerError,
    },
    /// Poller observed a status payload for a job.
    StatusPolled { job_id: String, job: JobSnapshot },
    /// Poller stopped after the configured maximum duration.
    PollExpired { job_id: String },
    /// User abandoned the current submission or job.
    CancelRequested,
    /// Render tick; also sent when no engine event arrived in time.
    Tick,
}
