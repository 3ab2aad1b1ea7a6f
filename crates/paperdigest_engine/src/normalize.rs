//! Tolerant readers for job payloads.
//!
//! The backend is not consistent about where it puts job fields: the id can be
//! `id`, `job_id` or `jobId`, at the top level or under a nested `job` object.
//! Everything here turns such payloads into a [`JobSnapshot`] so the rest of
//! the crate never inspects raw JSON.

use paperdigest_core::{JobSnapshot, JobStatus};
use serde_json::Value;

use crate::JobSummary;

const ID_KEYS: [&str; 3] = ["id", "job_id", "jobId"];
const NESTED_JOB_KEY: &str = "job";

type IdStrategy = fn(&Value) -> Option<String>;

/// Tried in order; the first strategy that finds an id wins.
const ID_STRATEGIES: [IdStrategy; 2] = [top_level_id, nested_job_id];

pub fn extract_job_id(payload: &Value) -> Option<String> {
    ID_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(payload))
}

pub fn normalize_job(payload: &Value) -> JobSnapshot {
    JobSnapshot {
        id: extract_job_id(payload),
        status: field(payload, "status")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|status| !status.is_empty())
            .map(ToOwned::to_owned),
        progress: field(payload, "progress").and_then(progress_value),
        error_message: field(payload, "error_message")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned),
    }
}

pub(crate) fn summarize_job(payload: &Value) -> JobSummary {
    let job = normalize_job(payload);
    let text = |key: &str| {
        field(payload, key)
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
    };
    JobSummary {
        status: job
            .status
            .as_deref()
            .map(JobStatus::from_token)
            .unwrap_or_default(),
        id: job.id,
        status_label: job.status,
        progress: job.progress,
        error_message: job.error_message,
        source_type: text("source_type"),
        created_at: text("created_at"),
        updated_at: text("updated_at"),
    }
}

/// Extracts a human-readable reason from an error body.
///
/// Understands `{"message": ...}`, FastAPI's `{"detail": ...}` (string or
/// list of `{"msg": ...}`) and falls back to the raw text.
pub fn backend_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    let Ok(payload) = serde_json::from_str::<Value>(trimmed) else {
        return Some(trimmed.to_string());
    };

    if let Some(message) = payload.get("message").and_then(Value::as_str) {
        return Some(message.to_string());
    }
    match payload.get("detail") {
        Some(Value::String(detail)) => return Some(detail.clone()),
        Some(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if !messages.is_empty() {
                return Some(messages.join("; "));
            }
        }
        _ => {}
    }
    Some(trimmed.to_string())
}

fn top_level_id(payload: &Value) -> Option<String> {
    id_in(payload)
}

fn nested_job_id(payload: &Value) -> Option<String> {
    payload.get(NESTED_JOB_KEY).and_then(id_in)
}

fn id_in(object: &Value) -> Option<String> {
    ID_KEYS
        .iter()
        .find_map(|key| object.get(key).and_then(id_value))
}

fn id_value(value: &Value) -> Option<String> {
    match value {
        Value::String(id) if !id.trim().is_empty() => Some(id.trim().to_string()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

// Top-level values win over the nested job object; nulls count as absent.
fn field<'a>(payload: &'a Value, key: &str) -> Option<&'a Value> {
    payload
        .get(key)
        .filter(|value| !value.is_null())
        .or_else(|| {
            payload
                .get(NESTED_JOB_KEY)
                .and_then(|job| job.get(key))
                .filter(|value| !value.is_null())
        })
}

fn progress_value(value: &Value) -> Option<u8> {
    let progress = value.as_f64()?;
    if !progress.is_finite() {
        return None;
    }
    Some(progress.clamp(0.0, 100.0).round() as u8)
}
