use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use paperdigest_core::Msg;
use paperdigest_engine::MAX_PAGE_LIMIT;
use paperdigest_logging::LogDestination;

use crate::config::Overrides;

#[derive(Debug, Parser)]
#[command(
    name = "paperdigest",
    version,
    about = "Submit papers for summarizing and follow their progress"
)]
pub struct Cli {
    /// RON config file (defaults to ./paperdigest.ron when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Owner id sent with submissions.
    #[arg(long, global = true)]
    pub owner: Option<String>,

    #[arg(long, global = true, value_enum, default_value_t = LogTarget::Terminal)]
    pub log: LogTarget,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit a file or link and follow it until it finishes.
    Submit(SubmitArgs),
    /// Show the current status of a job.
    Status { job_id: String },
    /// List jobs.
    Jobs {
        #[arg(long, default_value_t = 0)]
        offset: u32,
        #[arg(long, default_value_t = MAX_PAGE_LIMIT)]
        limit: u32,
    },
    /// Delete a job.
    Delete { job_id: String },
}

#[derive(Debug, Args)]
pub struct SubmitArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Stop waiting after this many seconds.
    #[arg(long)]
    pub max_wait_secs: Option<u64>,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Document to upload.
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Link to a paper, e.g. an arXiv abstract page.
    #[arg(long)]
    pub link: Option<String>,
}

impl SourceArgs {
    pub fn into_msg(self) -> Msg {
        match (self.file, self.link) {
            (Some(path), _) => Msg::FileSubmitted(path),
            (None, Some(link)) => Msg::LinkSubmitted(link),
            // clap's group makes this unreachable; the controller rejects it anyway.
            (None, None) => Msg::LinkSubmitted(String::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogTarget {
    Terminal,
    File,
    Both,
    Off,
}

impl From<LogTarget> for LogDestination {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Terminal => LogDestination::Terminal,
            LogTarget::File => LogDestination::File,
            LogTarget::Both => LogDestination::Both,
            LogTarget::Off => LogDestination::Off,
        }
    }
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn overrides(&self) -> Overrides {
        let max_poll_secs = match &self.command {
            Command::Submit(args) => args.max_wait_secs,
            _ => None,
        };
        Overrides {
            api_url: self.api_url.clone(),
            owner_id: self.owner.clone(),
            max_poll_secs,
        }
    }
}
