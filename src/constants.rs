// src/constants.rs

use std::time::Duration;

/// Delay between two polls of the foreground window.
pub const TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Idle time is only queried every Nth tick (10 * 500ms = 5s).
pub const IDLE_CHECK_TICKS: u32 = 10;

/// Seconds without input before a regular activity is considered idle.
pub const IDLE_THRESHOLD_SECS: u64 = 5 * 60;

/// Seconds without input before a meeting is considered idle.
pub const MEETING_IDLE_THRESHOLD_SECS: u64 = 60 * 60;

/// Shortest idle period that is written to the log as "Inactive".
pub const MIN_INACTIVE_SECS: u64 = 5 * 60;

/// Shortest regular activity interval that is written to the log.
pub const MIN_ACTIVITY_SECS: u64 = 1;

pub const MEETINGS_CATEGORY: &str = "Meetings";
pub const UNCATEGORIZED_CATEGORY: &str = "Uncategorized";
pub const INACTIVE_LABEL: &str = "Inactive";

/// Timestamp layout of the StartTime/EndTime log columns (local time).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const LOG_HEADER: &str =
    "StartTime,EndTime,DurationSeconds,WindowTitle,WindowDetails,ProcessName,Category";

/// Directory created under Documents / local app data to hold the log.
pub const LOG_DIR_NAME: &str = "ActivityLogger";

/// Used when neither a Documents folder nor local app data resolves.
pub const FALLBACK_LOG_FILE: &str = "ActivityLog.csv";

/// Maximum category / keyword length accepted from the config file.
pub const MAX_RULE_FIELD_LEN: usize = 100;
