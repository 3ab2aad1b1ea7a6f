//! Paperdigest core: pure submission/progress state machine and view-model helpers.
mod effect;
mod error;
mod link;
mod msg;
mod state;
mod status;
mod steps;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::{TrackerError, ValidationError};
pub use link::validate_link;
pub use msg::Msg;
pub use state::{
    AppState, JobSnapshot, Outcome, Phase, SubmissionId, TrackedJob, DEFAULT_OWNER_ID,
    TERMINAL_ERROR_FALLBACK,
};
pub use status::JobStatus;
pub use steps::{project, validate_steps, PipelineStep, StepConfigError, StepState, DEFAULT_STEPS};
pub use update::update;
pub use view_model::{AppViewModel, StepRowView};
