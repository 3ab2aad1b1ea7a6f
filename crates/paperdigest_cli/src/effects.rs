use std::time::Duration;

use paperdigest_core::{Effect, Msg};
use paperdigest_engine::{EngineError, EngineEvent, EngineHandle};
use paperdigest_logging::{digest_info, digest_warn};

/// Executes controller effects on the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitLink {
                    submission,
                    url,
                    owner_id,
                } => {
                    digest_info!("SubmitLink submission={} url={}", submission, url);
                    self.engine.submit_link(submission, url, &owner_id);
                }
                Effect::SubmitFile {
                    submission,
                    path,
                    owner_id,
                } => {
                    digest_info!("SubmitFile submission={} path={:?}", submission, path);
                    self.engine.submit_file(submission, path, &owner_id);
                }
                Effect::StartPolling { job_id } => {
                    self.engine.start_polling(job_id);
                }
                Effect::StopPolling { job_id } => {
                    self.engine.stop_polling(job_id);
                }
            }
        }
    }

    /// Next message from the engine, or `None` when nothing arrived within `timeout`.
    pub fn next_msg(&self, timeout: Duration) -> Result<Option<Msg>, EngineError> {
        Ok(self.engine.recv_timeout(timeout)?.map(event_to_msg))
    }
}

pub(crate) fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Submitted {
            submission,
            result: Ok(job),
        } => Msg::SubmissionSucceeded { submission, job },
        EngineEvent::Submitted {
            submission,
            result: Err(err),
        } => {
            digest_warn!("Submission {} failed: {}", submission, err);
            Msg::SubmissionFailed {
                submission,
                error: err.into_tracker_error(),
            }
        }
        EngineEvent::StatusUpdate { job_id, job } => Msg::StatusPolled { job_id, job },
        EngineEvent::PollExpired { job_id } => Msg::PollExpired { job_id },
    }
}

#[cfg(test)]
mod tests {
    use paperdigest_core::{JobSnapshot, Msg, TrackerError, ValidationError};
    use paperdigest_engine::{ApiError, EngineEvent, FailureKind};

    use super::event_to_msg;

    #[test]
    fn validation_failures_stay_validation_errors() {
        let msg = event_to_msg(EngineEvent::Submitted {
            submission: 3,
            result: Err(ApiError {
                kind: FailureKind::Validation(ValidationError::MissingInput),
                message: "no file or link was provided".to_string(),
            }),
        });
        assert_eq!(
            msg,
            Msg::SubmissionFailed {
                submission: 3,
                error: TrackerError::Validation(ValidationError::MissingInput),
            }
        );
    }

    #[test]
    fn http_failures_become_submission_errors() {
        let msg = event_to_msg(EngineEvent::Submitted {
            submission: 1,
            result: Err(ApiError {
                kind: FailureKind::HttpStatus(500),
                message: "Upload failed".to_string(),
            }),
        });
        assert_eq!(
            msg,
            Msg::SubmissionFailed {
                submission: 1,
                error: TrackerError::submission("Upload failed"),
            }
        );
    }

    #[test]
    fn status_updates_pass_through() {
        let job = JobSnapshot {
            id: Some("abc".to_string()),
            status: Some("processing".to_string()),
            progress: Some(45),
            error_message: None,
        };
        assert_eq!(
            event_to_msg(EngineEvent::StatusUpdate {
                job_id: "abc".to_string(),
                job: job.clone(),
            }),
            Msg::StatusPolled {
                job_id: "abc".to_string(),
                job,
            }
        );
    }
}
