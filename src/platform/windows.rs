#![allow(unsafe_code, reason = "Win32 FFI calls")]

use super::WindowInspector;
use std::path::Path;
use windows_sys::Win32::Foundation::{CloseHandle, HWND};
use windows_sys::Win32::System::SystemInformation::GetTickCount;
use windows_sys::Win32::System::Threading::{
    OpenProcess, QueryFullProcessImageNameW, PROCESS_QUERY_LIMITED_INFORMATION,
};
use windows_sys::Win32::UI::Input::KeyboardAndMouse::{GetLastInputInfo, LASTINPUTINFO};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    GetForegroundWindow, GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId,
};

/// Capacity of the buffer receiving a process image path.
const IMAGE_PATH_CAPACITY: usize = 1024;

#[derive(Debug, Default)]
pub struct WindowsInspector;

impl WindowsInspector {
    pub fn new() -> Self {
        Self
    }

    fn foreground_window() -> Option<HWND> {
        let hwnd = unsafe { GetForegroundWindow() };
        if hwnd.is_null() {
            None
        } else {
            Some(hwnd)
        }
    }

    fn window_text(hwnd: HWND) -> String {
        let len = unsafe { GetWindowTextLengthW(hwnd) };
        let Ok(len) = usize::try_from(len) else {
            return String::new();
        };
        if len == 0 {
            return String::new();
        }

        let mut buf = vec![0u16; len + 1];
        let capacity = i32::try_from(buf.len()).unwrap_or(i32::MAX);
        let read = unsafe { GetWindowTextW(hwnd, buf.as_mut_ptr(), capacity) };
        match usize::try_from(read) {
            Ok(read) if read > 0 => {
                buf.truncate(read);
                String::from_utf16_lossy(&buf)
            }
            _ => String::new(),
        }
    }

    fn process_image_path(pid: u32) -> Option<String> {
        let handle = unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, 0, pid) };
        if handle.is_null() {
            return None;
        }

        let mut buf = vec![0u16; IMAGE_PATH_CAPACITY];
        let mut size = u32::try_from(buf.len()).unwrap_or(u32::MAX);
        let ok = unsafe { QueryFullProcessImageNameW(handle, 0, buf.as_mut_ptr(), &mut size) };
        unsafe { CloseHandle(handle) };

        if ok == 0 || size == 0 {
            return None;
        }
        buf.truncate(usize::try_from(size).ok()?);
        Some(String::from_utf16_lossy(&buf))
    }
}

impl WindowInspector for WindowsInspector {
    fn current_window_title(&self) -> String {
        Self::foreground_window().map(Self::window_text).unwrap_or_default()
    }

    fn current_process_name(&self) -> String {
        let Some(hwnd) = Self::foreground_window() else {
            return String::new();
        };

        let mut pid: u32 = 0;
        unsafe { GetWindowThreadProcessId(hwnd, &mut pid) };
        if pid == 0 {
            return String::new();
        }

        Self::process_image_path(pid)
            .and_then(|path| {
                Path::new(&path)
                    .file_name()
                    .and_then(|name| name.to_str())
                    .map(str::to_string)
            })
            .unwrap_or_default()
    }

    fn idle_seconds(&self) -> u64 {
        let mut info = LASTINPUTINFO {
            cbSize: u32::try_from(std::mem::size_of::<LASTINPUTINFO>()).unwrap_or(0),
            dwTime: 0,
        };
        if unsafe { GetLastInputInfo(&mut info) } == 0 {
            return 0;
        }

        // 32-bit millisecond tick counts; wrapping_sub survives the 49.7 day rollover
        let now = unsafe { GetTickCount() };
        u64::from(now.wrapping_sub(info.dwTime)) / 1000
    }
}
