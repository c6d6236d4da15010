use crate::categorizer::Categorizer;
use crate::platform::WindowInspector;

/// One observation of the foreground window, classified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivitySample {
    pub window_title: String,
    pub process_name: String,
    pub details: String,
    pub category: String,
}

impl ActivitySample {
    pub fn new(window_title: &str, process_name: &str, categorizer: &Categorizer) -> Self {
        let details = categorizer.details(window_title, process_name);
        let category = categorizer.category(window_title, process_name, &details);
        Self {
            window_title: window_title.to_string(),
            process_name: process_name.to_string(),
            details,
            category,
        }
    }

    /// Query the inspector for the current foreground window and classify it.
    pub fn observe(inspector: &dyn WindowInspector, categorizer: &Categorizer) -> Self {
        let title = inspector.current_window_title();
        let process = inspector.current_process_name();
        Self::new(&title, &process, categorizer)
    }

    /// Whether `other` starts a new interval. The process name alone never does.
    pub fn differs_from(&self, other: &Self) -> bool {
        self.window_title != other.window_title
            || self.details != other.details
            || self.category != other.category
    }
}
