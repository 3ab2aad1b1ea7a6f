use paperdigest_core::{project, JobStatus, PipelineStep, StepState, DEFAULT_STEPS};
use pretty_assertions::assert_eq;

use StepState::{Active, Completed, Queued};

const STEPS: [PipelineStep; 4] = [
    PipelineStep::new("upload", 10),
    PipelineStep::new("parse", 40),
    PipelineStep::new("summarize", 70),
    PipelineStep::new("quiz", 90),
];

#[test]
fn processing_progress_has_exactly_one_active_step() {
    for progress in 0..=100u8 {
        let states = project(Some(progress), JobStatus::Processing, &STEPS);
        assert_eq!(states.len(), STEPS.len());

        let active = states.iter().filter(|s| **s == Active).count();
        assert_eq!(active, 1, "progress {progress}");

        let all_reached = STEPS.iter().all(|step| progress >= step.threshold);
        for (index, (state, step)) in states.iter().zip(STEPS.iter()).enumerate() {
            if all_reached && index == STEPS.len() - 1 {
                assert_eq!(*state, Active, "progress {progress}");
            } else if progress >= step.threshold {
                assert_eq!(*state, Completed, "progress {progress} step {}", step.name);
            } else if *state != Active {
                assert_eq!(*state, Queued, "progress {progress} step {}", step.name);
            }
        }

        if let Some(first_pending) = STEPS.iter().position(|step| progress < step.threshold) {
            assert_eq!(states[first_pending], Active, "progress {progress}");
        }
    }
}

#[test]
fn states_at_midpoint() {
    assert_eq!(
        project(Some(45), JobStatus::Processing, &STEPS),
        vec![Completed, Completed, Active, Queued]
    );
}

#[test]
fn reaching_a_threshold_completes_the_step() {
    assert_eq!(
        project(Some(40), JobStatus::Processing, &STEPS),
        vec![Completed, Completed, Active, Queued]
    );
    assert_eq!(
        project(Some(39), JobStatus::Processing, &STEPS),
        vec![Completed, Active, Queued, Queued]
    );
}

#[test]
fn past_every_threshold_keeps_last_step_active() {
    assert_eq!(
        project(Some(100), JobStatus::Processing, &STEPS),
        vec![Completed, Completed, Completed, Active]
    );
}

#[test]
fn done_completes_every_step_regardless_of_progress() {
    for progress in [None, Some(0), Some(45), Some(100)] {
        assert_eq!(
            project(progress, JobStatus::Done, &DEFAULT_STEPS),
            vec![Completed; DEFAULT_STEPS.len()]
        );
    }
}

#[test]
fn error_status_projects_like_processing() {
    assert_eq!(
        project(Some(45), JobStatus::Error, &STEPS),
        project(Some(45), JobStatus::Processing, &STEPS)
    );
}

#[test]
fn regressions_are_rendered_as_reported() {
    let ahead = project(Some(75), JobStatus::Processing, &STEPS);
    let behind = project(Some(20), JobStatus::Processing, &STEPS);
    assert_eq!(ahead, vec![Completed, Completed, Completed, Active]);
    assert_eq!(behind, vec![Completed, Active, Queued, Queued]);
}
