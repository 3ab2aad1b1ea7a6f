use crate::{JobStatus, Phase, StepState, TrackerError};

/// Presentation-ready snapshot of the controller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub job_id: Option<String>,
    pub status: Option<JobStatus>,
    /// Raw status token as the backend reported it.
    pub status_label: Option<String>,
    pub progress: Option<u8>,
    /// Empty until a job is being tracked.
    pub steps: Vec<StepRowView>,
    pub error: Option<TrackerError>,
    pub can_submit: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRowView {
    pub name: &'static str,
    pub threshold: u8,
    pub state: StepState,
}

impl AppViewModel {
    pub fn active_step(&self) -> Option<&StepRowView> {
        self.steps.iter().find(|row| row.state == StepState::Active)
    }
}
