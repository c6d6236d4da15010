use crate::constants::{INACTIVE_LABEL, TIMESTAMP_FORMAT};
use crate::models::ActivitySample;
use chrono::{DateTime, Local};

/// A finished span of time attributed to one window. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityInterval {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    pub window_title: String,
    pub details: String,
    pub process_name: String,
    pub category: String,
}

impl ActivityInterval {
    pub fn from_sample(
        sample: &ActivitySample,
        start: DateTime<Local>,
        end: DateTime<Local>,
    ) -> Self {
        Self {
            start,
            end,
            window_title: sample.window_title.clone(),
            details: sample.details.clone(),
            process_name: sample.process_name.clone(),
            category: sample.category.clone(),
        }
    }

    /// Synthesized row covering a period without user input.
    pub fn inactive(start: DateTime<Local>, end: DateTime<Local>) -> Self {
        Self {
            start,
            end,
            window_title: INACTIVE_LABEL.to_string(),
            details: String::new(),
            process_name: String::new(),
            category: INACTIVE_LABEL.to_string(),
        }
    }

    /// Whole seconds between start and end, truncated toward zero.
    pub fn duration_secs(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }

    pub fn start_text(&self) -> String {
        self.start.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn end_text(&self) -> String {
        self.end.format(TIMESTAMP_FORMAT).to_string()
    }
}
