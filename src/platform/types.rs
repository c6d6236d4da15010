/// Read-only view of the desktop session used by the polling loop.
///
/// Every call is independent. When the OS cannot answer (no foreground
/// window, process exited mid-query, access denied) implementations return
/// empty values instead of failing.
pub trait WindowInspector: Send + Sync {
    /// Title of the foreground window, or an empty string.
    fn current_window_title(&self) -> String;

    /// Executable file name owning the foreground window, e.g. `EXCEL.EXE`.
    fn current_process_name(&self) -> String;

    /// Seconds since the last keyboard or mouse input, 0 if unknown.
    fn idle_seconds(&self) -> u64;
}
