use std::path::Path;

use paperdigest_core::{validate_link, JobSnapshot, ValidationError};
use paperdigest_logging::{digest_info, digest_warn};
use reqwest::multipart::{Form, Part};
use serde_json::json;

use crate::api::{map_reqwest_error, read_json};
use crate::normalize::normalize_job;
use crate::{ApiError, ApiSettings, SubmitInput};

/// Sends new work to the backend. It never starts polling on its own.
#[async_trait::async_trait]
pub trait SubmissionGateway: Send + Sync {
    async fn submit(&self, input: SubmitInput, owner_id: &str) -> Result<JobSnapshot, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestGateway {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestGateway {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = settings.build_client()?;
        Ok(Self { settings, client })
    }
}

#[async_trait::async_trait]
impl SubmissionGateway for ReqwestGateway {
    async fn submit(&self, input: SubmitInput, owner_id: &str) -> Result<JobSnapshot, ApiError> {
        validate(&input)?;
        let fallback = input.failure_message();

        let request = match input {
            SubmitInput::File { file_name, bytes } => {
                digest_info!("Uploading file={} bytes={}", file_name, bytes.len());
                let form = Form::new()
                    .part("file", Part::bytes(bytes).file_name(file_name))
                    .text("owner_user_id", owner_id.to_string());
                self.client
                    .post(self.settings.endpoint(&["v1", "jobs", "upload"])?)
                    .multipart(form)
            }
            SubmitInput::Link(url) => {
                let url = url.trim().to_string();
                digest_info!("Submitting link url={}", url);
                self.client
                    .post(self.settings.endpoint(&["v1", "jobs", "link"])?)
                    .json(&json!({ "url": url, "owner_user_id": owner_id }))
            }
        };

        let response = request.send().await.map_err(|err| {
            digest_warn!("Submission request failed: {}", err);
            let mapped = map_reqwest_error(err);
            ApiError::new(mapped.kind, fallback)
        })?;
        let payload = read_json(response, fallback).await?;
        let job = normalize_job(&payload);
        digest_info!(
            "Submission accepted id={:?} status={:?}",
            job.id,
            job.status
        );
        Ok(job)
    }
}

impl SubmitInput {
    /// Reads `path` into a file submission named after its last component.
    pub async fn from_path(path: &Path) -> Result<Self, ApiError> {
        let bytes = tokio::fs::read(path).await.map_err(|err| {
            ApiError::validation(ValidationError::UnreadableFile {
                path: path.display().to_string(),
                reason: err.to_string(),
            })
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(SubmitInput::File { file_name, bytes })
    }
}

fn validate(input: &SubmitInput) -> Result<(), ApiError> {
    match input {
        SubmitInput::File { file_name, bytes } => {
            if file_name.trim().is_empty() {
                return Err(ApiError::validation(ValidationError::MissingInput));
            }
            if bytes.is_empty() {
                return Err(ApiError::validation(ValidationError::EmptyFile {
                    name: file_name.clone(),
                }));
            }
        }
        SubmitInput::Link(raw) => {
            validate_link(raw).map_err(ApiError::validation)?;
        }
    }
    Ok(())
}
