use anyhow::Context;
use league_api::client::{Credentials, DEFAULT_BASE_URL, LeagueApi};
use log::LevelFilter;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_ENV: &str = "LEAGUE_BOARD_CONFIG";
pub const API_URL_ENV: &str = "LEAGUE_API_URL";
pub const API_TOKEN_ENV: &str = "LEAGUE_API_TOKEN";
pub const LOG_ENV: &str = "LEAGUE_BOARD_LOG";

/// Runtime settings: defaults, then the JSON config file, then environment,
/// then command-line flags.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub log_level: Option<String>,
    pub timeout_secs: u64,
    pub refresh_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_owned(),
            api_token: None,
            log_level: None,
            timeout_secs: 10,
            refresh_secs: 30,
        }
    }
}

impl Settings {
    pub fn load(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let settings = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(settings.apply_env(|key| std::env::var(key).ok()))
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("parse config {}", path.display()))
    }

    /// Non-empty environment values override the file.
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        if let Some(url) = var(API_URL_ENV) {
            self.api_base_url = url;
        }
        if let Some(token) = var(API_TOKEN_ENV) {
            self.api_token = Some(token);
        }
        if let Some(level) = var(LOG_ENV) {
            self.log_level = Some(level);
        }
        self
    }

    /// Unparseable levels fall back to `warn`.
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level
            .as_deref()
            .and_then(|level| level.parse().ok())
            .unwrap_or(LevelFilter::Warn)
    }

    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.max(1))
    }

    pub fn client(&self) -> LeagueApi {
        let api = LeagueApi::new(&self.api_base_url)
            .with_timeout(Duration::from_secs(self.timeout_secs.max(1)));
        match &self.api_token {
            Some(token) => api.with_credentials(Credentials::bearer(token)),
            None => api,
        }
    }
}
