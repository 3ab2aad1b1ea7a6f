use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use paperdigest_core::SubmissionId;
use paperdigest_logging::{digest_debug, digest_info};
use thiserror::Error;

use crate::gateway::{ReqwestGateway, SubmissionGateway};
use crate::poller::{PollSettings, Poller};
use crate::sink::{ChannelEventSink, EventSink};
use crate::store::{JobStore, ReqwestJobStore};
use crate::{ApiError, ApiSettings, EngineEvent, JobId, SubmitInput};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("engine thread stopped unexpectedly")]
    Disconnected,
}

enum EngineCommand {
    SubmitLink {
        submission: SubmissionId,
        url: String,
        owner_id: String,
    },
    SubmitFile {
        submission: SubmissionId,
        path: PathBuf,
        owner_id: String,
    },
    StartPolling {
        job_id: JobId,
    },
    StopPolling {
        job_id: JobId,
    },
}

/// Runs backend IO on a background Tokio runtime.
///
/// Commands go in through the handle; results come back as [`EngineEvent`]s
/// which the owner drains from its own loop. Dropping the handle stops every
/// poll and shuts the runtime down.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ApiSettings) -> Result<Self, EngineError> {
        let gateway = Arc::new(ReqwestGateway::new(settings.clone())?);
        let store = Arc::new(ReqwestJobStore::new(settings.clone())?);
        Self::with_parts(gateway, store, settings.poll_settings())
    }

    pub fn with_parts(
        gateway: Arc<dyn SubmissionGateway>,
        store: Arc<dyn JobStore>,
        poll_settings: PollSettings,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            let _enter = runtime.enter();
            let poller = Poller::new(store, poll_settings);
            let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));

            while let Ok(command) = cmd_rx.recv() {
                handle_command(&runtime, &poller, gateway.clone(), sink.clone(), command);
            }
            digest_debug!("Engine command channel closed, shutting down");
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit_link(&self, submission: SubmissionId, url: impl Into<String>, owner_id: &str) {
        self.send(EngineCommand::SubmitLink {
            submission,
            url: url.into(),
            owner_id: owner_id.to_string(),
        });
    }

    pub fn submit_file(&self, submission: SubmissionId, path: PathBuf, owner_id: &str) {
        self.send(EngineCommand::SubmitFile {
            submission,
            path,
            owner_id: owner_id.to_string(),
        });
    }

    pub fn start_polling(&self, job_id: impl Into<JobId>) {
        self.send(EngineCommand::StartPolling {
            job_id: job_id.into(),
        });
    }

    pub fn stop_polling(&self, job_id: impl Into<JobId>) {
        self.send(EngineCommand::StopPolling {
            job_id: job_id.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event. `Ok(None)` means nothing arrived.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineError> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineError::Disconnected),
        }
    }

    fn send(&self, command: EngineCommand) {
        // Only fails after the engine thread is gone, i.e. during shutdown.
        let _ = self.cmd_tx.send(command);
    }
}

fn handle_command(
    runtime: &tokio::runtime::Runtime,
    poller: &Poller,
    gateway: Arc<dyn SubmissionGateway>,
    sink: Arc<dyn EventSink>,
    command: EngineCommand,
) {
    match command {
        EngineCommand::SubmitLink {
            submission,
            url,
            owner_id,
        } => {
            runtime.spawn(async move {
                let result = gateway.submit(SubmitInput::Link(url), &owner_id).await;
                sink.emit(EngineEvent::Submitted { submission, result });
            });
        }
        EngineCommand::SubmitFile {
            submission,
            path,
            owner_id,
        } => {
            runtime.spawn(async move {
                let result = match SubmitInput::from_path(&path).await {
                    Ok(input) => gateway.submit(input, &owner_id).await,
                    Err(err) => Err(err),
                };
                sink.emit(EngineEvent::Submitted { submission, result });
            });
        }
        EngineCommand::StartPolling { job_id } => {
            poller.start(job_id, sink);
        }
        EngineCommand::StopPolling { job_id } => {
            if poller.stop(&job_id) {
                digest_info!("Stopped polling job {}", job_id);
            }
        }
    }
}
