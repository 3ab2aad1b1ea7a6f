use paperdigest_core::JobSnapshot;
use paperdigest_logging::digest_trace;
use serde_json::Value;

use crate::api::{map_reqwest_error, read_json};
use crate::normalize::{normalize_job, summarize_job};
use crate::{ApiError, ApiSettings, FailureKind, JobSummary};

/// The backend caps list pages at this size.
pub const MAX_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: u32,
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: MAX_PAGE_LIMIT,
        }
    }
}

impl Page {
    pub fn new(offset: u32, limit: u32) -> Self {
        Self {
            offset,
            limit: limit.clamp(1, MAX_PAGE_LIMIT),
        }
    }
}

/// Read and delete access to jobs the backend already knows about.
#[async_trait::async_trait]
pub trait JobStore: Send + Sync {
    async fn get(&self, job_id: &str) -> Result<JobSnapshot, ApiError>;
    async fn list(&self, page: Page) -> Result<Vec<JobSummary>, ApiError>;
    async fn delete(&self, job_id: &str) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobStore {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestJobStore {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = settings.build_client()?;
        Ok(Self { settings, client })
    }
}

#[async_trait::async_trait]
impl JobStore for ReqwestJobStore {
    async fn get(&self, job_id: &str) -> Result<JobSnapshot, ApiError> {
        let url = self.settings.endpoint(&["v1", "jobs", job_id])?;
        digest_trace!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let payload = read_json(response, "Failed to fetch job").await?;
        let mut job = normalize_job(&payload);
        if job.id.is_none() {
            job.id = Some(job_id.to_string());
        }
        Ok(job)
    }

    async fn list(&self, page: Page) -> Result<Vec<JobSummary>, ApiError> {
        let page = Page::new(page.offset, page.limit);
        let mut url = self.settings.endpoint(&["v1", "jobs"])?;
        url.query_pairs_mut()
            .append_pair("offset", &page.offset.to_string())
            .append_pair("limit", &page.limit.to_string());
        digest_trace!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        match read_json(response, "Failed to fetch jobs").await? {
            Value::Array(items) => Ok(items.iter().map(summarize_job).collect()),
            Value::Object(map) => match map.get("jobs") {
                Some(Value::Array(items)) => Ok(items.iter().map(summarize_job).collect()),
                _ => Err(ApiError::new(
                    FailureKind::Decode,
                    "expected a list of jobs",
                )),
            },
            _ => Err(ApiError::new(FailureKind::Decode, "expected a list of jobs")),
        }
    }

    async fn delete(&self, job_id: &str) -> Result<(), ApiError> {
        let url = self.settings.endpoint(&["v1", "jobs", job_id])?;
        digest_trace!("DELETE {}", url);
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response, "Failed to delete job").await?;
        Ok(())
    }
}
