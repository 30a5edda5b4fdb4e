use std::fs;
use std::path::Path;
use std::time::Duration;

use dashboard_logging::{dashboard_info, dashboard_warn};
use scrape_engine::{ApiSettings, EngineConfig, PollSettings};
use serde::Deserialize;
use thiserror::Error;

/// Optional settings read from the RON config file. Absent fields keep defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub base_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub max_poll_failures: Option<u32>,
    pub request_timeout_secs: Option<u64>,
    pub max_run_secs: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: ron::error::SpannedError,
    },
}

/// Reads the config file; `Ok(None)` when it does not exist.
pub fn read_config(path: &Path) -> Result<Option<DashboardConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                source,
            })
        }
    };

    ron::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
}

/// Like [`read_config`], but any problem is logged and defaults are used.
pub fn load_config(path: &Path) -> DashboardConfig {
    match read_config(path) {
        Ok(Some(config)) => {
            dashboard_info!("Loaded config from {:?}", path);
            config
        }
        Ok(None) => DashboardConfig::default(),
        Err(err) => {
            dashboard_warn!("{}; using defaults", err);
            DashboardConfig::default()
        }
    }
}

impl DashboardConfig {
    /// Builds the engine configuration; `base_url_override` wins over the file.
    pub fn engine_config(&self, base_url_override: Option<&str>) -> EngineConfig {
        let mut api = ApiSettings::default();
        if let Some(base_url) = base_url_override.or(self.base_url.as_deref()) {
            api.base_url = base_url.to_string();
        }
        if let Some(secs) = self.request_timeout_secs {
            api.request_timeout = Duration::from_secs(secs);
        }

        let mut poll = PollSettings::default();
        if let Some(ms) = self.poll_interval_ms {
            poll.interval = Duration::from_millis(ms);
        }
        if let Some(max) = self.max_poll_failures {
            poll.max_consecutive_failures = max.max(1);
        }
        if let Some(secs) = self.max_run_secs {
            poll.max_run_duration = Duration::from_secs(secs);
        }

        EngineConfig { api, poll }
    }
}
