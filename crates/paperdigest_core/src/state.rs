use crate::steps::{project, validate_steps, PipelineStep, StepConfigError, DEFAULT_STEPS};
use crate::view_model::{AppViewModel, StepRowView};
use crate::{JobStatus, TrackerError};

/// Placeholder owner sent with every submission until accounts exist.
pub const DEFAULT_OWNER_ID: &str = "test-user";

/// Shown for a failed job when the backend gives no reason.
pub const TERMINAL_ERROR_FALLBACK: &str = "An error occurred.";

/// Ticket handed out per submission so late gateway answers can be told apart.
pub type SubmissionId = u64;

/// Normalized job payload, whatever shape the backend answered with.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobSnapshot {
    pub id: Option<String>,
    pub status: Option<String>,
    pub progress: Option<u8>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Tracking,
    Terminal(Outcome),
}

impl Phase {
    /// New submissions are only accepted when nothing is in flight.
    pub fn accepts_submission(self) -> bool {
        matches!(self, Phase::Idle | Phase::Terminal(_))
    }
}

/// The job currently owned by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedJob {
    pub id: String,
    pub status: JobStatus,
    pub status_token: String,
    pub progress: Option<u8>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    owner_id: String,
    steps: Vec<PipelineStep>,
    phase: Phase,
    next_submission: SubmissionId,
    pending_submission: Option<SubmissionId>,
    job: Option<TrackedJob>,
    last_error: Option<TrackerError>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            owner_id: DEFAULT_OWNER_ID.to_string(),
            steps: DEFAULT_STEPS.to_vec(),
            phase: Phase::Idle,
            next_submission: 1,
            pending_submission: None,
            job: None,
            last_error: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = owner_id.into();
        self
    }

    pub fn with_steps(mut self, steps: Vec<PipelineStep>) -> Result<Self, StepConfigError> {
        validate_steps(&steps)?;
        self.steps = steps;
        Ok(self)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn job(&self) -> Option<&TrackedJob> {
        self.job.as_ref()
    }

    pub fn last_error(&self) -> Option<&TrackerError> {
        self.last_error.as_ref()
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn view(&self) -> AppViewModel {
        let steps = match &self.job {
            Some(job) => project(job.progress, job.status, &self.steps)
                .into_iter()
                .zip(&self.steps)
                .map(|(state, step)| StepRowView {
                    name: step.name,
                    threshold: step.threshold,
                    state,
                })
                .collect(),
            None => Vec::new(),
        };

        AppViewModel {
            phase: self.phase,
            job_id: self.job.as_ref().map(|job| job.id.clone()),
            status: self.job.as_ref().map(|job| job.status),
            status_label: self.job.as_ref().map(|job| job.status_token.clone()),
            progress: self.job.as_ref().and_then(|job| job.progress),
            steps,
            error: self.last_error.clone(),
            can_submit: self.phase.accepts_submission(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn pending_submission(&self) -> Option<SubmissionId> {
        self.pending_submission
    }

    pub(crate) fn tracked_job_id(&self) -> Option<&str> {
        match self.phase {
            Phase::Tracking => self.job.as_ref().map(|job| job.id.as_str()),
            _ => None,
        }
    }

    /// Enters `Submitting` and discards whatever the previous job was.
    pub(crate) fn begin_submission(&mut self) -> SubmissionId {
        let submission = self.next_submission;
        self.next_submission += 1;
        self.pending_submission = Some(submission);
        self.phase = Phase::Submitting;
        self.job = None;
        self.last_error = None;
        self.dirty = true;
        submission
    }

    /// Returns to `Idle` with an error for the presentation layer.
    pub(crate) fn fail_to_idle(&mut self, error: TrackerError) {
        self.pending_submission = None;
        self.phase = Phase::Idle;
        self.job = None;
        self.last_error = Some(error);
        self.dirty = true;
    }

    /// Seeds the tracked job from the submission response.
    ///
    /// Returns `true` when the job still needs polling.
    pub(crate) fn start_tracking(&mut self, id: String, job: &JobSnapshot) -> bool {
        self.pending_submission = None;
        let token = job
            .status
            .clone()
            .unwrap_or_else(|| JobStatus::Queued.as_str().to_string());
        self.job = Some(TrackedJob {
            id,
            status: JobStatus::from_token(&token),
            status_token: token,
            progress: job.progress,
            error_message: None,
        });
        self.phase = Phase::Tracking;
        self.dirty = true;
        self.settle_if_terminal(job.error_message.clone())
    }

    /// Applies a polled payload. Payloads without a status change nothing.
    ///
    /// Returns `true` when the update moved the job to a terminal state.
    pub(crate) fn apply_status(&mut self, job: &JobSnapshot) -> bool {
        let Some(token) = job.status.as_deref() else {
            return false;
        };
        let Some(tracked) = self.job.as_mut() else {
            return false;
        };
        tracked.status = JobStatus::from_token(token);
        tracked.status_token = token.to_string();
        if let Some(progress) = job.progress {
            tracked.progress = Some(progress);
        }
        self.dirty = true;
        !self.settle_if_terminal(job.error_message.clone())
    }

    pub(crate) fn expire(&mut self) {
        self.phase = Phase::Terminal(Outcome::Error);
        self.last_error = Some(TrackerError::terminal("Timed out waiting for job"));
        self.dirty = true;
    }

    pub(crate) fn abandon(&mut self) {
        self.pending_submission = None;
        self.phase = Phase::Idle;
        self.job = None;
        self.last_error = None;
        self.dirty = true;
    }

    // Moves to `Terminal` when the tracked status is terminal. Returns `true`
    // while the job is still in flight.
    fn settle_if_terminal(&mut self, error_message: Option<String>) -> bool {
        let Some(job) = self.job.as_mut() else {
            return false;
        };
        match job.status {
            JobStatus::Done => {
                self.phase = Phase::Terminal(Outcome::Done);
                false
            }
            JobStatus::Error => {
                let message = error_message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| TERMINAL_ERROR_FALLBACK.to_string());
                job.error_message = Some(message.clone());
                self.phase = Phase::Terminal(Outcome::Error);
                self.last_error = Some(TrackerError::terminal(message));
                false
            }
            JobStatus::Queued | JobStatus::Processing => true,
        }
    }
}
