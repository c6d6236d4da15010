use crate::constants::LOG_HEADER;
use crate::error::AppError;
use crate::models::ActivityInterval;
use log::warn;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Append-only CSV log of finished activity intervals.
pub struct ActivityRecorder {
    log_path: PathBuf,
}

impl ActivityRecorder {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Append one row for `interval`.
    ///
    /// Returns `Ok(false)` without touching the file when the interval lasts
    /// less than one whole second. The header is written only when the log
    /// file does not exist yet.
    pub fn record(&self, interval: &ActivityInterval) -> Result<bool, AppError> {
        let duration = interval.duration_secs();
        if duration <= 0 {
            return Ok(false);
        }

        if let Some(parent) = self.log_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file_exists = self.log_path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        let mut out = String::new();
        if !file_exists {
            out.push_str(LOG_HEADER);
            out.push('\n');
        }
        out.push_str(&format_row(interval, duration));
        out.push('\n');

        file.write_all(out.as_bytes())?;
        Ok(true)
    }
}

/// Lock a shared recorder, recovering from a poisoned mutex.
pub fn lock_recorder(recorder: &Mutex<ActivityRecorder>) -> MutexGuard<'_, ActivityRecorder> {
    match recorder.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!("ActivityRecorder: mutex was poisoned, recovering");
            poisoned.into_inner()
        }
    }
}

fn format_row(interval: &ActivityInterval, duration: i64) -> String {
    format!(
        "{},{},{},{},{},{},{}",
        interval.start_text(),
        interval.end_text(),
        duration,
        quote(&interval.window_title),
        quote(&interval.details),
        quote(&interval.process_name),
        quote(&interval.category),
    )
}

/// Quote a text field, doubling embedded quotes.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::at;
    use tempfile::tempdir;

    fn excel_interval(start: i64, end: i64) -> ActivityInterval {
        ActivityInterval {
            start: at(start),
            end: at(end),
            window_title: "Report.xlsx".to_string(),
            details: "Report".to_string(),
            process_name: "EXCEL.EXE".to_string(),
            category: "Work - Office".to_string(),
        }
    }

    #[test]
    fn test_fresh_log_gets_header_then_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let recorder = ActivityRecorder::new(&path);

        assert!(recorder.record(&excel_interval(0, 930)).unwrap());
        assert!(recorder.record(&excel_interval(930, 1000)).unwrap());

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], LOG_HEADER);
        assert_eq!(
            lines[1],
            r#"2024-01-01 09:00:00,2024-01-01 09:15:30,930,"Report.xlsx","Report","EXCEL.EXE","Work - Office""#
        );
        assert_eq!(content.matches("StartTime").count(), 1);
    }

    #[test]
    fn test_existing_log_never_gets_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.csv");
        fs::write(&path, "previous content\n").unwrap();

        let recorder = ActivityRecorder::new(&path);
        recorder.record(&excel_interval(0, 10)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("previous content\n"));
        assert!(!content.contains("StartTime"));
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_non_positive_duration_is_discarded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let recorder = ActivityRecorder::new(&path);

        assert!(!recorder.record(&excel_interval(5, 5)).unwrap());
        assert!(!recorder.record(&excel_interval(10, 5)).unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn test_creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ActivityLogger").join("nested").join("log.csv");
        let recorder = ActivityRecorder::new(&path);

        recorder.record(&excel_interval(0, 1)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_text_fields_survive_commas_and_quotes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let recorder = ActivityRecorder::new(&path);

        let mut interval = excel_interval(0, 42);
        interval.window_title = r#"Budget, "final" - Excel"#.to_string();
        interval.details = r#"Budget, "final""#.to_string();
        recorder.record(&interval).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 7);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(&row[2], "42");
        assert_eq!(&row[3], r#"Budget, "final" - Excel"#);
        assert_eq!(&row[4], r#"Budget, "final""#);
        assert_eq!(&row[6], "Work - Office");
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = tempdir().unwrap();
        // A directory where the log file should be
        let recorder = ActivityRecorder::new(dir.path());
        assert!(recorder.record(&excel_interval(0, 10)).is_err());
    }
}
