//! Shared test utilities for the activity logger.
//!
//! Provides fixed timestamps and a scriptable `WindowInspector` so the
//! polling loop can be driven without a desktop session.

#![cfg(test)]

use crate::platform::WindowInspector;
use crate::recorder::ActivityRecorder;
use chrono::{DateTime, Duration, Local, TimeZone};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::{tempdir, TempDir};

/// 2024-01-01 09:00:00 local time plus `secs` seconds.
pub fn at(secs: i64) -> DateTime<Local> {
    let base = Local
        .with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
        .single()
        .expect("unambiguous base timestamp");
    base + Duration::seconds(secs)
}

#[derive(Debug, Default)]
struct Screen {
    title: String,
    process: String,
    idle_secs: u64,
}

/// Inspector whose answers are set by the test. Clones share the same screen.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInspector {
    screen: Arc<Mutex<Screen>>,
}

impl ScriptedInspector {
    pub fn showing(title: &str, process: &str) -> Self {
        let inspector = Self::default();
        inspector.show(title, process);
        inspector
    }

    pub fn show(&self, title: &str, process: &str) {
        let mut screen = self.screen.lock().unwrap();
        screen.title = title.to_string();
        screen.process = process.to_string();
    }

    pub fn set_idle(&self, secs: u64) {
        self.screen.lock().unwrap().idle_secs = secs;
    }
}

impl WindowInspector for ScriptedInspector {
    fn current_window_title(&self) -> String {
        self.screen.lock().unwrap().title.clone()
    }

    fn current_process_name(&self) -> String {
        self.screen.lock().unwrap().process.clone()
    }

    fn idle_seconds(&self) -> u64 {
        self.screen.lock().unwrap().idle_secs
    }
}

/// Create a recorder writing into a fresh temporary directory.
///
/// Returns (recorder, log path, TempDir). The TempDir must be kept alive for
/// the duration of the test so the log file is not deleted.
pub fn setup_test_recorder() -> (Arc<Mutex<ActivityRecorder>>, PathBuf, TempDir) {
    let dir = tempdir().expect("Failed to create temp directory for test log");
    let log_path = dir.path().join("ActivityLog.csv");
    let recorder = Arc::new(Mutex::new(ActivityRecorder::new(&log_path)));
    (recorder, log_path, dir)
}

/// Data rows of a log file (header excluded), parsed with the csv crate.
pub fn read_rows(log_path: &Path) -> Vec<csv::StringRecord> {
    if !log_path.exists() {
        return Vec::new();
    }
    let mut reader = csv::Reader::from_path(log_path).expect("Failed to open test log");
    reader.records().map(|r| r.expect("Malformed log row")).collect()
}
