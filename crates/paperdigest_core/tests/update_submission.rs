use std::path::PathBuf;
use std::sync::Once;

use paperdigest_core::{
    update, AppState, Effect, JobSnapshot, Msg, Phase, TrackerError, ValidationError,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(paperdigest_logging::initialize_for_tests);
}

fn queued(id: &str) -> JobSnapshot {
    JobSnapshot {
        id: Some(id.to_string()),
        status: Some("queued".to_string()),
        progress: Some(0),
        error_message: None,
    }
}

#[test]
fn link_submission_enters_submitting_and_emits_effect() {
    init_logging();
    let (mut state, effects) = update(
        AppState::new().with_owner("owner-1"),
        Msg::LinkSubmitted("  https://arxiv.org/abs/2401.00001 ".to_string()),
    );

    assert_eq!(state.phase(), Phase::Submitting);
    assert_eq!(
        effects,
        vec![Effect::SubmitLink {
            submission: 1,
            url: "https://arxiv.org/abs/2401.00001".to_string(),
            owner_id: "owner-1".to_string(),
        }]
    );
    assert!(!state.view().can_submit);
    assert!(state.consume_dirty());
}

#[test]
fn link_is_submitted_exactly_as_typed() {
    init_logging();
    for link in ["https://arxiv.org", "https://ArXiv.org/abs/1706.03762?q=a b"] {
        let (_, effects) = update(AppState::new(), Msg::LinkSubmitted(link.to_string()));
        assert_eq!(
            effects,
            vec![Effect::SubmitLink {
                submission: 1,
                url: link.to_string(),
                owner_id: "test-user".to_string(),
            }]
        );
    }
}

#[test]
fn file_submission_uses_default_owner() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::FileSubmitted(PathBuf::from("paper.pdf")),
    );

    assert_eq!(state.phase(), Phase::Submitting);
    assert_eq!(
        effects,
        vec![Effect::SubmitFile {
            submission: 1,
            path: PathBuf::from("paper.pdf"),
            owner_id: "test-user".to_string(),
        }]
    );
}

#[test]
fn invalid_link_is_a_validation_error_without_effects() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::LinkSubmitted("arxiv".to_string()));

    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Idle);
    assert!(matches!(
        state.last_error(),
        Some(TrackerError::Validation(ValidationError::InvalidUrl { .. }))
    ));
}

#[test]
fn missing_input_is_a_validation_error() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::LinkSubmitted("   ".to_string()));
    assert!(effects.is_empty());
    assert_eq!(
        state.last_error(),
        Some(&TrackerError::Validation(ValidationError::MissingInput))
    );

    let (state, effects) = update(AppState::new(), Msg::FileSubmitted(PathBuf::new()));
    assert!(effects.is_empty());
    assert_eq!(
        state.last_error(),
        Some(&TrackerError::Validation(ValidationError::MissingInput))
    );
}

#[test]
fn second_submission_is_rejected_while_submitting() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::LinkSubmitted("https://a.example.com".to_string()),
    );
    let before = state.clone();

    let (mut state, effects) = update(
        state,
        Msg::LinkSubmitted("https://b.example.com".to_string()),
    );
    assert!(effects.is_empty());
    assert_eq!(state, before);
    assert!(state.consume_dirty());

    let (state, effects) = update(state, Msg::FileSubmitted(PathBuf::from("x.pdf")));
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Submitting);
}

#[test]
fn second_submission_is_rejected_while_tracking() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::LinkSubmitted("https://a.example.com".to_string()),
    );
    let (state, _) = update(
        state,
        Msg::SubmissionSucceeded {
            submission: 1,
            job: queued("job-1"),
        },
    );
    assert_eq!(state.phase(), Phase::Tracking);

    let (state, effects) = update(
        state,
        Msg::LinkSubmitted("https://b.example.com".to_string()),
    );
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Tracking);
    assert_eq!(state.job().map(|job| job.id.as_str()), Some("job-1"));
}

#[test]
fn success_with_id_starts_tracking_and_polling() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::LinkSubmitted("https://a.example.com".to_string()),
    );
    let (state, effects) = update(
        state,
        Msg::SubmissionSucceeded {
            submission: 1,
            job: queued("abc"),
        },
    );

    assert_eq!(state.phase(), Phase::Tracking);
    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            job_id: "abc".to_string()
        }]
    );
    let view = state.view();
    assert_eq!(view.job_id.as_deref(), Some("abc"));
    assert_eq!(view.status_label.as_deref(), Some("queued"));
    assert_eq!(view.progress, Some(0));
}

#[test]
fn success_without_status_seeds_queued() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::FileSubmitted(PathBuf::from("a.pdf")));
    let (state, _) = update(
        state,
        Msg::SubmissionSucceeded {
            submission: 1,
            job: JobSnapshot {
                id: Some("abc".to_string()),
                ..JobSnapshot::default()
            },
        },
    );

    let view = state.view();
    assert_eq!(view.status, Some(paperdigest_core::JobStatus::Queued));
    assert_eq!(view.progress, None);
}

#[test]
fn success_without_id_returns_to_idle_and_never_polls() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::LinkSubmitted("https://a.example.com".to_string()),
    );
    let (state, effects) = update(
        state,
        Msg::SubmissionSucceeded {
            submission: 1,
            job: JobSnapshot {
                status: Some("queued".to_string()),
                ..JobSnapshot::default()
            },
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Idle);
    assert!(matches!(
        state.last_error(),
        Some(TrackerError::Submission { .. })
    ));
}

#[test]
fn submission_failure_returns_to_idle_with_error() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::LinkSubmitted("https://a.example.com".to_string()),
    );
    let (state, effects) = update(
        state,
        Msg::SubmissionFailed {
            submission: 1,
            error: TrackerError::submission("Link submission failed"),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.phase, Phase::Idle);
    assert!(view.can_submit);
    assert_eq!(
        view.error,
        Some(TrackerError::submission("Link submission failed"))
    );
}

#[test]
fn stale_submission_results_are_ignored() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::LinkSubmitted("https://a.example.com".to_string()),
    );
    let (state, _) = update(state, Msg::CancelRequested);
    let (state, _) = update(
        state,
        Msg::LinkSubmitted("https://b.example.com".to_string()),
    );

    // Answer for the abandoned first submission arrives late.
    let (state, effects) = update(
        state,
        Msg::SubmissionSucceeded {
            submission: 1,
            job: queued("old"),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Submitting);

    let (state, effects) = update(
        state,
        Msg::SubmissionSucceeded {
            submission: 2,
            job: queued("new"),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            job_id: "new".to_string()
        }]
    );
    assert_eq!(state.job().map(|job| job.id.as_str()), Some("new"));
}
