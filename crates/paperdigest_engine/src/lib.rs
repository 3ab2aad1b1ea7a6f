//! Paperdigest engine: backend IO and effect execution.
mod api;
mod engine;
mod gateway;
mod normalize;
mod poller;
mod sink;
mod store;
mod types;

pub use api::{ApiSettings, DEFAULT_API_URL};
pub use engine::{EngineError, EngineHandle};
pub use gateway::{ReqwestGateway, SubmissionGateway};
pub use normalize::{backend_message, extract_job_id, normalize_job};
pub use poller::{PollHandle, PollSettings, Poller};
pub use sink::{ChannelEventSink, EventSink};
pub use store::{JobStore, Page, ReqwestJobStore, MAX_PAGE_LIMIT};
pub use types::{ApiError, EngineEvent, FailureKind, JobId, JobSummary, SubmitInput};
