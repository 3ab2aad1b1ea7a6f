use chrono::{DateTime, NaiveDateTime, Utc};
use paperdigest_core::{AppViewModel, Outcome, Phase, StepRowView, StepState, TrackerError};
use paperdigest_engine::JobSummary;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Renders the controller view model as terminal lines.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    match view.phase {
        Phase::Idle => {}
        Phase::Submitting => lines.push("Submitting...".to_string()),
        Phase::Tracking | Phase::Terminal(_) => {
            lines.push(headline(view));
            lines.extend(view.steps.iter().map(step_line));
        }
    }

    match (view.phase, &view.error) {
        (_, Some(error)) => lines.push(error_line(error)),
        (Phase::Terminal(Outcome::Done), None) => lines.push("Done.".to_string()),
        _ => {}
    }
    lines
}

pub fn step_line(row: &StepRowView) -> String {
    let marker = match row.state {
        StepState::Completed => "[x]",
        StepState::Active => "[>]",
        StepState::Queued => "[ ]",
    };
    format!("  {marker} {}", row.name)
}

/// One line per job, oldest first as the backend returns them.
pub fn job_table(jobs: &[JobSummary]) -> Vec<String> {
    if jobs.is_empty() {
        return vec!["No jobs yet.".to_string()];
    }
    let mut lines = vec![format!(
        "{:<38} {:<12} {:>8}  {}",
        "ID", "STATUS", "PROGRESS", "UPDATED"
    )];
    lines.extend(jobs.iter().map(|job| {
        format!(
            "{:<38} {:<12} {:>8}  {}",
            job.id.as_deref().unwrap_or("-"),
            job.status_label.as_deref().unwrap_or(job.status.as_str()),
            job.progress
                .map(|progress| format!("{progress}%"))
                .unwrap_or_else(|| "-".to_string()),
            job.updated_at
                .as_deref()
                .map(format_timestamp)
                .unwrap_or_else(|| "-".to_string()),
        )
    }));
    lines
}

/// Formats backend timestamps in UTC; naive timestamps are taken as UTC.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Utc).format(TIMESTAMP_FORMAT).to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.and_utc().format(TIMESTAMP_FORMAT).to_string();
    }
    raw.to_string()
}

fn headline(view: &AppViewModel) -> String {
    let id = view.job_id.as_deref().unwrap_or("?");
    let status = view
        .status_label
        .as_deref()
        .or_else(|| view.status.map(|status| status.as_str()))
        .unwrap_or("unknown");
    match view.progress {
        Some(progress) => format!("job {id}  {status}  {progress}%"),
        None => format!("job {id}  {status}"),
    }
}

fn error_line(error: &TrackerError) -> String {
    match error {
        TrackerError::Validation(err) => format!("Invalid input: {err}"),
        TrackerError::Submission { message } => format!("Submission failed: {message}"),
        TrackerError::Terminal { message } => format!("Job failed: {message}"),
    }
}
