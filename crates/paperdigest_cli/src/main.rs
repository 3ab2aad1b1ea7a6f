mod app;
mod cli;
mod commands;
mod config;
mod effects;
mod render;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    paperdigest_logging::initialize(cli.log.into(), cli.log_level());

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: cli::Cli) -> anyhow::Result<ExitCode> {
    let overrides = cli.overrides();
    let settings = config::load(cli.config.as_deref(), |key| std::env::var(key).ok(), overrides)?;

    match cli.command {
        cli::Command::Submit(args) => app::run_submit(&settings, args.source.into_msg()),
        cli::Command::Status { job_id } => commands::show_status(&settings, &job_id),
        cli::Command::Jobs { offset, limit } => commands::list_jobs(&settings, offset, limit),
        cli::Command::Delete { job_id } => commands::delete_job(&settings, &job_id),
    }
}
