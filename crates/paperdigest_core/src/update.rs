use crate::{validate_link, AppState, Effect, Msg, Phase, TrackerError, ValidationError};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::LinkSubmitted(raw) => {
            if !state.phase().accepts_submission() {
                return (state, Vec::new());
            }
            match validate_link(&raw) {
                Ok(url) => {
                    let submission = state.begin_submission();
                    vec![Effect::SubmitLink {
                        submission,
                        url,
                        owner_id: state.owner_id().to_string(),
                    }]
                }
                Err(err) => {
                    state.fail_to_idle(err.into());
                    Vec::new()
                }
            }
        }
        Msg::FileSubmitted(path) => {
            if !state.phase().accepts_submission() {
                return (state, Vec::new());
            }
            if path.as_os_str().is_empty() {
                state.fail_to_idle(ValidationError::MissingInput.into());
                return (state, Vec::new());
            }
            let submission = state.begin_submission();
            vec![Effect::SubmitFile {
                submission,
                path,
                owner_id: state.owner_id().to_string(),
            }]
        }
        Msg::SubmissionSucceeded { submission, job } => {
            if state.phase() != Phase::Submitting || state.pending_submission() != Some(submission)
            {
                return (state, Vec::new());
            }
            match job.id.clone().filter(|id| !id.trim().is_empty()) {
                Some(job_id) => {
                    if state.start_tracking(job_id.clone(), &job) {
                        vec![Effect::StartPolling { job_id }]
                    } else {
                        Vec::new()
                    }
                }
                None => {
                    state.fail_to_idle(TrackerError::submission(
                        "backend response did not include a job id",
                    ));
                    Vec::new()
                }
            }
        }
        Msg::SubmissionFailed { submission, error } => {
            if state.phase() == Phase::Submitting && state.pending_submission() == Some(submission)
            {
                state.fail_to_idle(error);
            }
            Vec::new()
        }
        Msg::StatusPolled { job_id, job } => {
            if state.tracked_job_id() != Some(job_id.as_str()) {
                return (state, Vec::new());
            }
            if state.apply_status(&job) {
                vec![Effect::StopPolling { job_id }]
            } else {
                Vec::new()
            }
        }
        Msg::PollExpired { job_id } => {
            if state.tracked_job_id() != Some(job_id.as_str()) {
                return (state, Vec::new());
            }
            state.expire();
            vec![Effect::StopPolling { job_id }]
        }
        Msg::CancelRequested => match state.phase() {
            Phase::Tracking => {
                let job_id = state.tracked_job_id().map(ToOwned::to_owned);
                state.abandon();
                job_id
                    .map(|job_id| vec![Effect::StopPolling { job_id }])
                    .unwrap_or_default()
            }
            Phase::Submitting => {
                state.abandon();
                Vec::new()
            }
            Phase::Idle | Phase::Terminal(_) => Vec::new(),
        },
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}
