pub mod types;

pub use types::WindowInspector;

#[cfg(windows)]
pub mod windows;

#[cfg(windows)]
pub use self::windows::WindowsInspector as NativeInspector;

/// Foreground window tracking is only implemented for Windows. Elsewhere the
/// logger runs but sees no window and no idle time.
#[cfg(not(windows))]
#[derive(Debug, Default)]
pub struct NativeInspector;

#[cfg(not(windows))]
impl NativeInspector {
    pub fn new() -> Self {
        log::warn!("foreground window tracking is unavailable on this platform");
        Self
    }
}

#[cfg(not(windows))]
impl WindowInspector for NativeInspector {
    fn current_window_title(&self) -> String {
        String::new()
    }

    fn current_process_name(&self) -> String {
        String::new()
    }

    fn idle_seconds(&self) -> u64 {
        0
    }
}
