pub mod categorizer;
pub mod config;
mod constants;
pub mod control;
pub mod error;
pub mod models;
pub mod paths;
pub mod platform;
pub mod recorder;
#[cfg(test)]
mod test_utils;
pub mod tracker;
mod validation;

use crate::categorizer::Categorizer;
use crate::config::AppConfig;
use crate::control::ControlConsole;
use crate::error::AppError;
use crate::platform::NativeInspector;
use crate::recorder::ActivityRecorder;
use crate::tracker::TrackerService;
use log::info;
use std::io;
use std::sync::{Arc, Mutex};

/// Build the tracker described by `config`, logging to the configured or
/// resolved per-machine path.
pub fn build_tracker(config: &AppConfig) -> TrackerService {
    let log_path = config
        .log_path
        .clone()
        .unwrap_or_else(paths::default_log_path);
    info!("Logging activity to {}", log_path.display());

    let categorizer = Arc::new(Categorizer::new(config.categories.clone()));
    let recorder = Arc::new(Mutex::new(ActivityRecorder::new(log_path)));

    TrackerService::new(
        Arc::new(NativeInspector::new()),
        categorizer,
        recorder,
        config.tracker_config(),
    )
}

/// Load the config, start logging and serve console commands from stdin
/// until `quit` or end of input.
pub fn run() -> Result<(), AppError> {
    let config = match AppConfig::default_path() {
        Some(path) => AppConfig::load(&path)?,
        None => AppConfig::default(),
    };

    let tracker = build_tracker(&config);
    tracker.start()?;

    let stdin = io::stdin();
    ControlConsole::new(&tracker).run(stdin.lock(), io::stdout())?;

    tracker.stop()?;
    info!("Activity logger exiting");
    Ok(())
}
