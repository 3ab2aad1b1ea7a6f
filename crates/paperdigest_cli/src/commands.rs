//! One-shot commands against the job store.

use std::future::Future;
use std::process::ExitCode;

use anyhow::Context;
use paperdigest_core::{
    project, JobSnapshot, JobStatus, StepRowView, DEFAULT_STEPS, TERMINAL_ERROR_FALLBACK,
};
use paperdigest_engine::{ApiSettings, JobStore, Page, ReqwestJobStore};
use paperdigest_logging::digest_info;

use crate::render::{job_table, step_line};

pub fn show_status(settings: &ApiSettings, job_id: &str) -> anyhow::Result<ExitCode> {
    let store = ReqwestJobStore::new(settings.clone())?;
    let job = block_on(store.get(job_id))?
        .with_context(|| format!("failed to fetch job {job_id}"))?;

    for line in status_lines(job_id, &job) {
        println!("{line}");
    }
    let failed = job
        .status
        .as_deref()
        .map(JobStatus::from_token)
        .is_some_and(|status| status == JobStatus::Error);
    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

pub fn list_jobs(settings: &ApiSettings, offset: u32, limit: u32) -> anyhow::Result<ExitCode> {
    let store = ReqwestJobStore::new(settings.clone())?;
    let page = Page::new(offset, limit);
    let jobs = block_on(store.list(page))?.context("failed to list jobs")?;
    digest_info!("Listed {} jobs (offset {}, limit {})", jobs.len(), page.offset, page.limit);

    for line in job_table(&jobs) {
        println!("{line}");
    }
    Ok(ExitCode::SUCCESS)
}

pub fn delete_job(settings: &ApiSettings, job_id: &str) -> anyhow::Result<ExitCode> {
    let store = ReqwestJobStore::new(settings.clone())?;
    block_on(store.delete(job_id))?.with_context(|| format!("failed to delete job {job_id}"))?;
    println!("Deleted job {job_id}");
    Ok(ExitCode::SUCCESS)
}

fn status_lines(job_id: &str, job: &JobSnapshot) -> Vec<String> {
    let token = job.status.as_deref().unwrap_or("unknown");
    let status = JobStatus::from_token(token);
    let mut lines = vec![match job.progress {
        Some(progress) => format!("job {job_id}  {token}  {progress}%"),
        None => format!("job {job_id}  {token}"),
    }];
    lines.extend(
        project(job.progress, status, &DEFAULT_STEPS)
            .into_iter()
            .zip(DEFAULT_STEPS.iter())
            .map(|(state, step)| {
                step_line(&StepRowView {
                    name: step.name,
                    threshold: step.threshold,
                    state,
                })
            }),
    );
    if status == JobStatus::Error {
        let message = job
            .error_message
            .as_deref()
            .filter(|message| !message.trim().is_empty())
            .unwrap_or(TERMINAL_ERROR_FALLBACK);
        lines.push(format!("Job failed: {message}"));
    }
    lines
}

fn block_on<F: Future>(future: F) -> anyhow::Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    Ok(runtime.block_on(future))
}
