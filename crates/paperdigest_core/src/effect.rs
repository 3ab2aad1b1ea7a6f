use std::path::PathBuf;

use crate::SubmissionId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitLink {
        submission: SubmissionId,
        url: String,
        owner_id: String,
    },
    SubmitFile {
        submission: SubmissionId,
        path: PathBuf,
        owner_id: String,
    },
    StartPolling { job_id: String },
    StopPolling { job_id: String },
}
