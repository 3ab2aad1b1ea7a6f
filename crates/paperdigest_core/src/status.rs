use std::fmt;

/// Semantic class of a backend status token.
///
/// The backend reports an open set of strings; only these four classes
/// matter to the client. Unknown tokens are treated as still in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JobStatus {
    #[default]
    Queued,
    Processing,
    Done,
    Error,
}

impl JobStatus {
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "queued" => JobStatus::Queued,
            "done" => JobStatus::Done,
            "error" => JobStatus::Error,
            _ => JobStatus::Processing,
        }
    }

    /// `done` and `error` end a job's lifecycle; nothing follows them.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Processing => "processing",
            JobStatus::Done => "done",
            JobStatus::Error => "error",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
