use crate::constants::{
    IDLE_CHECK_TICKS, IDLE_THRESHOLD_SECS, MEETING_IDLE_THRESHOLD_SECS, MIN_ACTIVITY_SECS,
    MIN_INACTIVE_SECS, TICK_INTERVAL,
};
use crate::error::AppError;
use crate::models::CategoryRule;
use crate::tracker::TrackerConfig;
use crate::validation::{validate_category_rule, validate_positive};
use directories::ProjectDirs;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// User settings read from `config.json`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Overrides the resolved per-machine log location.
    pub log_path: Option<PathBuf>,
    pub tick_interval_ms: u64,
    pub idle_check_ticks: u32,
    pub idle_threshold_secs: u64,
    pub meeting_idle_threshold_secs: u64,
    pub min_activity_secs: u64,
    pub min_inactive_secs: u64,
    /// Record the open interval when the logger stops instead of dropping it.
    pub flush_on_stop: bool,
    /// Extra keyword rules, tried before the built-in ones.
    pub categories: Vec<CategoryRule>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            tick_interval_ms: u64::try_from(TICK_INTERVAL.as_millis()).unwrap_or(500),
            idle_check_ticks: IDLE_CHECK_TICKS,
            idle_threshold_secs: IDLE_THRESHOLD_SECS,
            meeting_idle_threshold_secs: MEETING_IDLE_THRESHOLD_SECS,
            min_activity_secs: MIN_ACTIVITY_SECS,
            min_inactive_secs: MIN_INACTIVE_SECS,
            flush_on_stop: false,
            categories: Vec::new(),
        }
    }
}

impl AppConfig {
    /// `config.json` in the per-user config directory, if one can be determined.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "activitylogger", "ActivityLogger")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load and validate the config at `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        validate_positive("tick_interval_ms", self.tick_interval_ms)?;
        validate_positive("idle_check_ticks", u64::from(self.idle_check_ticks))?;
        validate_positive("idle_threshold_secs", self.idle_threshold_secs)?;
        validate_positive("meeting_idle_threshold_secs", self.meeting_idle_threshold_secs)?;
        validate_positive("min_activity_secs", self.min_activity_secs)?;
        validate_positive("min_inactive_secs", self.min_inactive_secs)?;
        self.categories.iter().try_for_each(validate_category_rule)
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            idle_check_ticks: self.idle_check_ticks,
            idle_threshold_secs: self.idle_threshold_secs,
            meeting_idle_threshold_secs: self.meeting_idle_threshold_secs,
            min_activity_secs: self.min_activity_secs,
            min_inactive_secs: self.min_inactive_secs,
            flush_on_stop: self.flush_on_stop,
        }
    }
}
