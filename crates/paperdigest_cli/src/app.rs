//! Drives one submission from start to a terminal state.

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use paperdigest_core::{update, AppState, Msg, Outcome, Phase, TrackerError};
use paperdigest_engine::{ApiSettings, EngineHandle};
use paperdigest_logging::{digest_debug, digest_info, digest_warn};

use crate::effects::EffectRunner;
use crate::render::render;

const EVENT_WAIT: Duration = Duration::from_millis(250);
const EXIT_INTERRUPTED: u8 = 130;

struct App {
    state: AppState,
    runner: EffectRunner,
    shown: Vec<String>,
}

impl App {
    fn dispatch(&mut self, msg: Msg) {
        digest_debug!("Dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.enqueue(effects);
        if state.consume_dirty() {
            self.show(render(&state.view()));
        }
        self.state = state;
    }

    fn show(&mut self, lines: Vec<String>) {
        if lines == self.shown {
            return;
        }
        for line in &lines {
            println!("{line}");
        }
        self.shown = lines;
    }
}

pub fn run_submit(settings: &ApiSettings, submission: Msg) -> anyhow::Result<ExitCode> {
    let engine = EngineHandle::new(settings.clone())?;
    let interrupted = watch_ctrl_c();
    let mut app = App {
        state: AppState::new().with_owner(settings.owner_id.clone()),
        runner: EffectRunner::new(engine),
        shown: Vec::new(),
    };

    app.dispatch(submission);
    let mut cancelled = false;
    while matches!(app.state.phase(), Phase::Submitting | Phase::Tracking) {
        if interrupted.swap(false, Ordering::SeqCst) {
            digest_info!("Interrupted, abandoning job");
            cancelled = true;
            app.dispatch(Msg::CancelRequested);
            break;
        }
        let msg = app
            .runner
            .next_msg(EVENT_WAIT)
            .context("lost contact with the engine")?
            .unwrap_or(Msg::Tick);
        app.dispatch(msg);
    }

    Ok(ExitCode::from(exit_status(
        app.state.phase(),
        app.state.last_error(),
        cancelled,
    )))
}

fn exit_status(phase: Phase, error: Option<&TrackerError>, cancelled: bool) -> u8 {
    if cancelled {
        return EXIT_INTERRUPTED;
    }
    match (phase, error) {
        (Phase::Terminal(Outcome::Done), _) => 0,
        (_, Some(TrackerError::Validation(_))) => 2,
        _ => 1,
    }
}

/// Sets the returned flag on Ctrl-C instead of killing the process.
fn watch_ctrl_c() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let setter = flag.clone();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build();
    match runtime {
        Ok(runtime) => {
            thread::spawn(move || {
                runtime.block_on(async {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        setter.store(true, Ordering::SeqCst);
                    }
                });
            });
        }
        Err(err) => digest_warn!("Ctrl-C handling unavailable: {}", err),
    }
    flag
}
