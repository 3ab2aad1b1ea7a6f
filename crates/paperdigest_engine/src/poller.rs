use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use paperdigest_core::JobStatus;
use paperdigest_logging::{digest_debug, digest_info, digest_trace, digest_warn};
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, EventSink, JobId, JobStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_duration: Option<Duration>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_duration: None,
        }
    }
}

/// Owned handle to one polling loop. Cancelling is idempotent.
#[derive(Debug, Clone)]
pub struct PollHandle {
    job_id: JobId,
    token: CancellationToken,
}

impl PollHandle {
    fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            token: CancellationToken::new(),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// True once cancelled, superseded, or stopped by a terminal status.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

type ActiveLoops = Arc<Mutex<HashMap<JobId, PollHandle>>>;

/// Runs at most one polling loop per job.
pub struct Poller {
    store: Arc<dyn JobStore>,
    settings: PollSettings,
    active: ActiveLoops,
}

impl Poller {
    pub fn new(store: Arc<dyn JobStore>, settings: PollSettings) -> Self {
        Self {
            store,
            settings,
            active: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Starts polling `job_id`, cancelling any loop already running for it.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self, job_id: impl Into<JobId>, sink: Arc<dyn EventSink>) -> PollHandle {
        let handle = PollHandle::new(job_id.into());
        if let Some(previous) = self
            .lock_active()
            .insert(handle.job_id.clone(), handle.clone())
        {
            if !previous.is_cancelled() {
                digest_debug!("Superseding poll for job {}", previous.job_id);
            }
            previous.cancel();
        }

        digest_info!(
            "Polling job {} every {:?}",
            handle.job_id,
            self.settings.interval
        );
        let store = self.store.clone();
        let settings = self.settings;
        let active = self.active.clone();
        let task_handle = handle.clone();
        tokio::spawn(async move {
            poll_loop(store, task_handle.clone(), settings, sink).await;
            forget(&active, &task_handle);
        });
        handle
    }

    /// Cancels and forgets the loop for `job_id`. Returns whether one was live.
    pub fn stop(&self, job_id: &str) -> bool {
        match self.lock_active().remove(job_id) {
            Some(handle) => {
                let was_live = !handle.is_cancelled();
                handle.cancel();
                was_live
            }
            None => false,
        }
    }

    pub fn stop_all(&self) {
        for (_, handle) in self.lock_active().drain() {
            handle.cancel();
        }
    }

    pub fn is_polling(&self, job_id: &str) -> bool {
        self.lock_active()
            .get(job_id)
            .is_some_and(|handle| !handle.is_cancelled())
    }

    /// Number of jobs whose loop has not finished yet.
    pub fn live_count(&self) -> usize {
        self.lock_active().len()
    }

    fn lock_active(&self) -> MutexGuard<'_, HashMap<JobId, PollHandle>> {
        lock(&self.active)
    }
}

fn lock(active: &ActiveLoops) -> MutexGuard<'_, HashMap<JobId, PollHandle>> {
    active.lock().unwrap_or_else(PoisonError::into_inner)
}

// Drops the registry entry of a loop that has exited. A live entry under the
// same id belongs to a newer loop and stays.
fn forget(active: &ActiveLoops, handle: &PollHandle) {
    let mut active = lock(active);
    if active
        .get(&handle.job_id)
        .is_some_and(PollHandle::is_cancelled)
    {
        active.remove(&handle.job_id);
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop_all();
    }
}

async fn poll_loop(
    store: Arc<dyn JobStore>,
    handle: PollHandle,
    settings: PollSettings,
    sink: Arc<dyn EventSink>,
) {
    let started = Instant::now();
    let deadline = settings.max_duration.map(|max| started + max);
    let mut ticker = time::interval_at(started + settings.interval, settings.interval);
    // Fetches run one after another, so a slow response delays the next tick
    // instead of overlapping with it.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let token = handle.token.clone();
    let mut tick: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        tick += 1;

        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            token.cancel();
            digest_warn!(
                "Giving up on job {} after {:?}",
                handle.job_id,
                settings.max_duration
            );
            sink.emit(EngineEvent::PollExpired {
                job_id: handle.job_id.clone(),
            });
            break;
        }

        digest_trace!("Poll job {} tick {}", handle.job_id, tick);
        let result = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            result = store.get(&handle.job_id) => result,
        };

        let job = match result {
            Ok(job) => job,
            Err(err) => {
                digest_warn!(
                    "Poll job {} tick {} failed, retrying: {}",
                    handle.job_id,
                    tick,
                    err
                );
                continue;
            }
        };

        let terminal = match job.status.as_deref() {
            Some(status) => JobStatus::from_token(status).is_terminal(),
            None => {
                digest_debug!(
                    "Poll job {} tick {} returned no status, ignoring",
                    handle.job_id,
                    tick
                );
                continue;
            }
        };

        // A response that raced with cancellation must not be published.
        if token.is_cancelled() {
            break;
        }
        sink.emit(EngineEvent::StatusUpdate {
            job_id: handle.job_id.clone(),
            job,
        });

        if terminal {
            digest_info!(
                "Job {} reached a terminal status after {} polls",
                handle.job_id,
                tick
            );
            token.cancel();
            break;
        }
    }
}
