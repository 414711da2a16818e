use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::duration::{parse_duration, parse_time_of_day};
use crate::error::ConfigError;
use crate::window::EvalWindow;

pub const DEFAULT_BASE_URL: &str = "https://api.ynab.com/v1";
pub const DEFAULT_RULES_DIR: &str = "rules";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3_600);
pub const DEFAULT_NOTIFIER: &str = "pushover";

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn process_env(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Trimmed, non-empty value from `lookup`.
fn env_opt(lookup: &dyn Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(v: &str) -> bool {
    matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn duration_value(key: &str, value: &str) -> Result<Duration, ConfigError> {
    parse_duration(value).ok_or_else(|| ConfigError::InvalidDuration {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn time_value(key: &str, value: &str) -> Result<chrono::NaiveTime, ConfigError> {
    parse_time_of_day(value).ok_or_else(|| ConfigError::InvalidTimeOfDay {
        key: key.to_string(),
        value: value.to_string(),
    })
}

// ── Top-level config ──────────────────────────────────────────

/// Runtime settings for the daemon and the CLI commands.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_token: String,
    pub budget_id: String,
    pub base_url: String,
    pub rules_dir: PathBuf,
    pub poll_interval: Duration,
    /// `pushover` (also when empty) or `log`.
    pub notifier: String,
    pub pushover: PushoverConfig,
    pub observe_path: PathBuf,
    pub debug: bool,
    pub window: EvalWindow,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PushoverConfig {
    pub app_token: String,
    pub user_key: String,
    pub device: String,
}

/// Command-line values; `Some` replaces whatever earlier layers produced.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub token: Option<String>,
    pub budget_id: Option<String>,
    pub base_url: Option<String>,
    pub rules_dir: Option<PathBuf>,
    pub notifier: Option<String>,
    pub poll_interval: Option<String>,
    pub observe_path: Option<PathBuf>,
    pub debug: Option<bool>,
    pub day_start: Option<String>,
    pub day_end: Option<String>,
}

/// Keys accepted in the YAML/JSON config file. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    token: Option<String>,
    budget_id: Option<String>,
    base_url: Option<String>,
    rules_dir: Option<String>,
    poll_interval: Option<String>,
    notifier: Option<String>,
    observe_path: Option<String>,
    debug: Option<bool>,
    day_start: Option<String>,
    day_end: Option<String>,
    pushover: PushoverConfig,
}

impl Config {
    /// Defaults, then the optional config file, then the process environment.
    ///
    /// Call [`load_dotenv`] first to pick up a `.env` file.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(file, &process_env)
    }

    /// Like [`load`](Self::load) with an explicit environment lookup.
    pub fn load_with(
        file: Option<&Path>,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut cfg = Self::defaults(lookup);
        if let Some(path) = file {
            cfg.apply_file(path)?;
        }
        cfg.apply_env(lookup)?;
        Ok(cfg)
    }

    fn defaults(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        Self {
            api_token: String::new(),
            budget_id: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            rules_dir: PathBuf::from(DEFAULT_RULES_DIR),
            poll_interval: DEFAULT_POLL_INTERVAL,
            notifier: DEFAULT_NOTIFIER.to_string(),
            pushover: PushoverConfig::default(),
            observe_path: default_observe_path(lookup),
            debug: false,
            window: EvalWindow::default(),
        }
    }

    fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let file: Option<FileConfig> =
            serde_yaml::from_str(&raw).map_err(|source| ConfigError::ParseFile {
                path: path.to_path_buf(),
                source,
            })?;
        let Some(file) = file else {
            return Ok(());
        };

        let text = |v: Option<String>| v.map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        if let Some(v) = text(file.token) {
            self.api_token = v;
        }
        if let Some(v) = text(file.budget_id) {
            self.budget_id = v;
        }
        if let Some(v) = text(file.base_url) {
            self.base_url = v;
        }
        if let Some(v) = text(file.rules_dir) {
            self.rules_dir = PathBuf::from(v);
        }
        if let Some(v) = text(file.notifier) {
            self.notifier = v;
        }
        if let Some(v) = text(file.observe_path) {
            self.observe_path = PathBuf::from(v);
        }
        if let Some(v) = text(file.poll_interval) {
            self.poll_interval = duration_value("poll_interval", &v)?;
        }
        if let Some(v) = file.debug {
            self.debug = v;
        }
        if let Some(v) = text(file.day_start) {
            self.window.start = Some(time_value("day_start", &v)?);
        }
        if let Some(v) = text(file.day_end) {
            self.window.end = Some(time_value("day_end", &v)?);
        }
        if let Some(v) = text(Some(file.pushover.app_token)) {
            self.pushover.app_token = v;
        }
        if let Some(v) = text(Some(file.pushover.user_key)) {
            self.pushover.user_key = v;
        }
        if let Some(v) = text(Some(file.pushover.device)) {
            self.pushover.device = v;
        }
        Ok(())
    }

    fn apply_env(&mut self, lookup: &dyn Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let get = |key| env_opt(lookup, key);

        if let Some(v) = get("YNAB_TOKEN") {
            self.api_token = v;
        }
        if let Some(v) = get("YNAB_BUDGET_ID") {
            self.budget_id = v;
        }
        if let Some(v) = get("YNAB_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = get("YNAB_RULES_DIR") {
            self.rules_dir = PathBuf::from(v);
        }
        if let Some(v) = get("YNAB_NOTIFIER") {
            self.notifier = v;
        }
        if let Some(v) = get("YNAB_OBSERVATIONS_PATH") {
            self.observe_path = PathBuf::from(v);
        }
        if let Some(v) = get("YNAB_POLL_INTERVAL") {
            self.poll_interval = duration_value("YNAB_POLL_INTERVAL", &v)?;
        }
        if let Some(v) = get("YNAB_DEBUG") {
            self.debug = parse_bool(&v);
        }
        if let Some(v) = get("YNAB_DAY_START") {
            self.window.start = Some(time_value("YNAB_DAY_START", &v)?);
        }
        if let Some(v) = get("YNAB_DAY_END") {
            self.window.end = Some(time_value("YNAB_DAY_END", &v)?);
        }
        if let Some(v) = get("PUSHOVER_APP_TOKEN") {
            self.pushover.app_token = v;
        }
        if let Some(v) = get("PUSHOVER_USER_KEY") {
            self.pushover.user_key = v;
        }
        if let Some(v) = get("PUSHOVER_DEVICE") {
            self.pushover.device = v;
        }
        Ok(())
    }

    /// Apply command-line values, the highest layer.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> Result<(), ConfigError> {
        let text = |v: &Option<String>| v.as_deref().map(str::trim).map(str::to_string);

        if let Some(v) = text(&overrides.token) {
            self.api_token = v;
        }
        if let Some(v) = text(&overrides.budget_id) {
            self.budget_id = v;
        }
        if let Some(v) = text(&overrides.base_url) {
            self.base_url = v;
        }
        if let Some(v) = &overrides.rules_dir {
            self.rules_dir = v.clone();
        }
        if let Some(v) = text(&overrides.notifier) {
            self.notifier = v;
        }
        if let Some(v) = &overrides.observe_path {
            self.observe_path = v.clone();
        }
        if let Some(v) = text(&overrides.poll_interval) {
            self.poll_interval = duration_value("--poll", &v)?;
        }
        if let Some(v) = overrides.debug {
            self.debug = v;
        }
        if let Some(v) = text(&overrides.day_start) {
            self.window.start = Some(time_value("--day-start", &v)?);
        }
        if let Some(v) = text(&overrides.day_end) {
            self.window.end = Some(time_value("--day-end", &v)?);
        }
        Ok(())
    }

    /// Consistency checks for running the daemon.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_token.is_empty() {
            return Err(ConfigError::Missing("YNAB_TOKEN"));
        }
        if self.budget_id.is_empty() {
            return Err(ConfigError::Missing("YNAB_BUDGET_ID"));
        }
        if self.uses_pushover()
            && (self.pushover.app_token.is_empty() || self.pushover.user_key.is_empty())
        {
            return Err(ConfigError::Missing(
                "PUSHOVER_APP_TOKEN and PUSHOVER_USER_KEY",
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::Invalid("poll interval must be > 0".to_string()));
        }
        self.window.validate()
    }

    pub fn uses_pushover(&self) -> bool {
        self.notifier.is_empty() || self.notifier == "pushover"
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  budget:      {}", self.budget_id);
        tracing::info!("  api:         {}", self.base_url);
        tracing::info!("  rules:       {}", self.rules_dir.display());
        tracing::info!("  poll:        {:?}", self.poll_interval);
        tracing::info!("  notifier:    {}", self.notifier);
        tracing::info!("  observe:     {}", self.observe_path.display());
        tracing::info!("  window:      {}", self.window);
    }
}

/// `$XDG_CACHE_HOME` (or the platform cache dir) `/ynab-alerts/observations.json`.
fn default_observe_path(lookup: &dyn Fn(&str) -> Option<String>) -> PathBuf {
    let cache_dir = env_opt(lookup, "XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(dirs::cache_dir)
        .unwrap_or_else(|| PathBuf::from(".cache"));
    cache_dir.join("ynab-alerts").join("observations.json")
}
