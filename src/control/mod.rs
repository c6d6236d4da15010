use crate::error::AppError;
use crate::tracker::TrackerService;
use log::error;
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Start,
    Stop,
    Restart,
    Status,
    Path,
    Help,
    Quit,
}

impl ControlCommand {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Result<Self, String>> {
        let word = line.trim().to_lowercase();
        let command = match word.as_str() {
            "" => return None,
            "start" => Self::Start,
            "stop" => Self::Stop,
            "restart" => Self::Restart,
            "status" => Self::Status,
            "path" => Self::Path,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => return Some(Err(word)),
        };
        Some(Ok(command))
    }
}

const HELP_TEXT: &str = "\
start    begin logging the foreground window
stop     pause logging (the open interval is not recorded unless flush_on_stop is set)
restart  stop and start logging again
status   show whether logging is running
path     show the log file location
quit     stop logging and exit";

/// Line-oriented control surface over a tracker.
///
/// Reads commands from `input` until `quit` or end of input and writes one
/// reply per command to `output`. Does not stop the tracker itself.
pub struct ControlConsole<'a> {
    tracker: &'a TrackerService,
}

impl<'a> ControlConsole<'a> {
    pub fn new(tracker: &'a TrackerService) -> Self {
        Self { tracker }
    }

    pub fn run<R: BufRead, W: Write>(&self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let command = match ControlCommand::parse(&line) {
                None => continue,
                Some(Ok(command)) => command,
                Some(Err(word)) => {
                    writeln!(output, "unknown command: {word} (try 'help')")?;
                    continue;
                }
            };

            if command == ControlCommand::Quit {
                break;
            }

            let reply = self.execute(command);
            writeln!(output, "{reply}")?;
            output.flush()?;
        }
        Ok(())
    }

    fn execute(&self, command: ControlCommand) -> String {
        let result: Result<String, AppError> = match command {
            ControlCommand::Start => self.tracker.start().map(|started| {
                if started {
                    "logging started".to_string()
                } else {
                    "already running".to_string()
                }
            }),
            ControlCommand::Stop => self.tracker.stop().map(|stopped| {
                if stopped {
                    "logging stopped".to_string()
                } else {
                    "not running".to_string()
                }
            }),
            ControlCommand::Restart => self
                .tracker
                .restart()
                .map(|()| "logging restarted".to_string()),
            ControlCommand::Status => Ok(self.status()),
            ControlCommand::Path => Ok(self.tracker.log_path().display().to_string()),
            ControlCommand::Help => Ok(HELP_TEXT.to_string()),
            ControlCommand::Quit => Ok(String::new()),
        };

        result.unwrap_or_else(|e| {
            error!("Control command {command:?} failed: {e}");
            format!("error: {e}")
        })
    }

    fn status(&self) -> String {
        let state = if self.tracker.is_running() {
            "running"
        } else {
            "stopped"
        };
        let failed = self.tracker.failed_writes();
        let mut status = format!("{state}, logging to {}", self.tracker.log_path().display());
        if failed > 0 {
            status.push_str(&format!(" ({failed} intervals could not be written)"));
        }
        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorizer::Categorizer;
    use crate::test_utils::{setup_test_recorder, ScriptedInspector};
    use crate::tracker::TrackerConfig;
    use std::io::Cursor;
    use std::sync::Arc;
    use std::time::Duration;

    fn tracker() -> (TrackerService, tempfile::TempDir) {
        let (recorder, _log_path, dir) = setup_test_recorder();
        let tracker = TrackerService::new(
            Arc::new(ScriptedInspector::showing("Untitled - Notepad", "notepad.exe")),
            Arc::new(Categorizer::default()),
            recorder,
            TrackerConfig {
                tick_interval: Duration::from_millis(10),
                ..TrackerConfig::default()
            },
        );
        (tracker, dir)
    }

    fn run(tracker: &TrackerService, script: &str) -> Vec<String> {
        let mut output = Vec::new();
        ControlConsole::new(tracker)
            .run(Cursor::new(script), &mut output)
            .unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ControlCommand::parse("  START "), Some(Ok(ControlCommand::Start)));
        assert_eq!(ControlCommand::parse("exit"), Some(Ok(ControlCommand::Quit)));
        assert_eq!(ControlCommand::parse("?"), Some(Ok(ControlCommand::Help)));
        assert_eq!(ControlCommand::parse("   "), None);
        assert_eq!(ControlCommand::parse("pause"), Some(Err("pause".to_string())));
    }

    #[test]
    fn test_start_stop_cycle() {
        let (tracker, _dir) = tracker();
        let replies = run(&tracker, "start\nstart\nstatus\nstop\nstop\n");

        assert_eq!(replies[0], "logging started");
        assert_eq!(replies[1], "already running");
        assert!(replies[2].starts_with("running, logging to "));
        assert_eq!(replies[3], "logging stopped");
        assert_eq!(replies[4], "not running");
        assert!(!tracker.is_running());
    }

    #[test]
    fn test_quit_ends_input_without_stopping() {
        let (tracker, _dir) = tracker();
        let replies = run(&tracker, "start\nquit\nstop\n");

        assert_eq!(replies, vec!["logging started".to_string()]);
        assert!(tracker.is_running());
        tracker.stop().unwrap();
    }

    #[test]
    fn test_restart_and_unknown_command() {
        let (tracker, _dir) = tracker();
        let replies = run(&tracker, "restart\nbogus\n\npath\n");

        assert_eq!(replies[0], "logging restarted");
        assert_eq!(replies[1], "unknown command: bogus (try 'help')");
        assert!(replies[2].ends_with("ActivityLog.csv"));
        assert!(tracker.is_running());
        tracker.stop().unwrap();
    }
}
