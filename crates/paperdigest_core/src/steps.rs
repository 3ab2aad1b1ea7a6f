use thiserror::Error;

use crate::JobStatus;

/// A named stage of the backend pipeline, reached once progress hits `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineStep {
    pub name: &'static str,
    pub threshold: u8,
}

impl PipelineStep {
    pub const fn new(name: &'static str, threshold: u8) -> Self {
        Self { name, threshold }
    }
}

/// Stages shown for every job, in pipeline order.
pub const DEFAULT_STEPS: [PipelineStep; 7] = [
    PipelineStep::new("upload", 10),
    PipelineStep::new("parse", 30),
    PipelineStep::new("sectionize", 40),
    PipelineStep::new("summarize", 60),
    PipelineStep::new("claims", 70),
    PipelineStep::new("cards", 80),
    PipelineStep::new("quiz", 90),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Completed,
    Active,
    Queued,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StepConfigError {
    #[error("pipeline must contain at least one step")]
    Empty,
    #[error("step `{name}` threshold {threshold} is not above the previous threshold {previous}")]
    NotIncreasing {
        name: &'static str,
        threshold: u8,
        previous: u8,
    },
    #[error("step `{name}` threshold {threshold} is above 100")]
    OutOfRange { name: &'static str, threshold: u8 },
}

/// Checks that a step table is non-empty with strictly increasing thresholds in `0..=100`.
pub fn validate_steps(steps: &[PipelineStep]) -> Result<(), StepConfigError> {
    if steps.is_empty() {
        return Err(StepConfigError::Empty);
    }
    let mut previous: Option<u8> = None;
    for step in steps {
        if step.threshold > 100 {
            return Err(StepConfigError::OutOfRange {
                name: step.name,
                threshold: step.threshold,
            });
        }
        if let Some(previous) = previous {
            if step.threshold <= previous {
                return Err(StepConfigError::NotIncreasing {
                    name: step.name,
                    threshold: step.threshold,
                    previous,
                });
            }
        }
        previous = Some(step.threshold);
    }
    Ok(())
}

/// Projects a progress percentage and status onto per-step states.
///
/// A `done` job renders every step completed whatever its progress. Otherwise
/// every reached step is completed, the first unreached step is active and the
/// rest are queued. When all thresholds are reached but the job is not done,
/// the last step stays active so there is never a gap between stages.
pub fn project(progress: Option<u8>, status: JobStatus, steps: &[PipelineStep]) -> Vec<StepState> {
    if status == JobStatus::Done {
        return vec![StepState::Completed; steps.len()];
    }

    let progress = progress.unwrap_or(0);
    let first_pending = steps.iter().position(|step| progress < step.threshold);

    let mut states: Vec<StepState> = steps
        .iter()
        .enumerate()
        .map(|(index, step)| match first_pending {
            _ if progress >= step.threshold => StepState::Completed,
            Some(active) if index == active => StepState::Active,
            _ => StepState::Queued,
        })
        .collect();

    if first_pending.is_none() {
        if let Some(last) = states.last_mut() {
            *last = StepState::Active;
        }
    }
    states
}
