//! Layered settings: defaults, then `paperdigest.ron`, then environment, then flags.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context};
use paperdigest_engine::ApiSettings;
use paperdigest_logging::digest_info;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILENAME: &str = "paperdigest.ron";
pub const ENV_API_URL: &str = "PAPERDIGEST_API_URL";
pub const ENV_OWNER: &str = "PAPERDIGEST_OWNER";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
struct FileConfig {
    api_url: Option<String>,
    owner_id: Option<String>,
    poll_interval_ms: Option<u64>,
    connect_timeout_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    max_poll_secs: Option<u64>,
}

/// Values given on the command line; they win over everything else.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub owner_id: Option<String>,
    pub max_poll_secs: Option<u64>,
}

/// Builds the engine settings.
///
/// An explicit `config_path` must exist; the default file is optional.
pub fn load(
    config_path: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
    overrides: Overrides,
) -> anyhow::Result<ApiSettings> {
    let file = match config_path {
        Some(path) => read_file(path)?,
        None => {
            let path = Path::new(CONFIG_FILENAME);
            if path.exists() {
                read_file(path)?
            } else {
                FileConfig::default()
            }
        }
    };

    let mut settings = ApiSettings::default();
    apply_file(&mut settings, file)?;

    if let Some(url) = env(ENV_API_URL).filter(|value| !value.trim().is_empty()) {
        settings.base_url = url;
    }
    if let Some(owner) = env(ENV_OWNER).filter(|value| !value.trim().is_empty()) {
        settings.owner_id = owner;
    }

    if let Some(url) = overrides.api_url {
        settings.base_url = url;
    }
    if let Some(owner) = overrides.owner_id {
        settings.owner_id = owner;
    }
    if let Some(secs) = overrides.max_poll_secs {
        settings.max_poll_duration = Some(Duration::from_secs(secs));
    }

    Ok(settings)
}

fn read_file(path: &Path) -> anyhow::Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: FileConfig = ron::from_str(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    digest_info!("Loaded config from {:?}", path);
    Ok(config)
}

fn apply_file(settings: &mut ApiSettings, file: FileConfig) -> anyhow::Result<()> {
    if let Some(url) = file.api_url {
        settings.base_url = url;
    }
    if let Some(owner) = file.owner_id {
        settings.owner_id = owner;
    }
    if let Some(ms) = file.poll_interval_ms {
        if ms == 0 {
            bail!("poll_interval_ms must be greater than zero");
        }
        settings.poll_interval = Duration::from_millis(ms);
    }
    if let Some(secs) = file.connect_timeout_secs {
        settings.connect_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = file.request_timeout_secs {
        settings.request_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = file.max_poll_secs {
        settings.max_poll_duration = Some(Duration::from_secs(secs));
    }
    Ok(())
}
