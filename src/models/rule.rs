use serde::{Deserialize, Serialize};

/// Maps a keyword found in a process name, title or details to a category label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub keyword: String,
    pub category: String,
}

impl CategoryRule {
    pub fn new(keyword: &str, category: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            category: category.to_string(),
        }
    }
}

/// Title suffix that an application appends after the document name,
/// e.g. `" - Excel"` for `excel.exe`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleSuffixRule {
    pub process: &'static str,
    pub suffix: &'static str,
}

/// Built-in keyword rules. Order is the tie-break: the first matching keyword wins.
pub const DEFAULT_CATEGORY_RULES: &[(&str, &str)] = &[
    ("excel", "Work - Office"),
    ("winword", "Work - Office"),
    ("powerpnt", "Work - Office"),
    ("outlook", "Email"),
    ("chrome", "Web Browsing"),
    ("firefox", "Web Browsing"),
    ("msedge", "Web Browsing"),
    ("teams", "Meetings"),
    ("slack", "Communication"),
    ("zoom", "Meetings"),
    ("notepad", "Notes"),
    ("code", "Development"),
    ("pycharm", "Development"),
    ("cmd", "Terminal"),
    ("powershell", "Terminal"),
];

pub const DEFAULT_TITLE_SUFFIXES: &[TitleSuffixRule] = &[
    TitleSuffixRule {
        process: "excel.exe",
        suffix: " - Excel",
    },
    TitleSuffixRule {
        process: "winword.exe",
        suffix: " - Word",
    },
    TitleSuffixRule {
        process: "powerpnt.exe",
        suffix: " - PowerPoint",
    },
    TitleSuffixRule {
        process: "outlook.exe",
        suffix: " - Outlook",
    },
    TitleSuffixRule {
        process: "chrome.exe",
        suffix: " - Google Chrome",
    },
    TitleSuffixRule {
        process: "msedge.exe",
        suffix: " - Microsoft Edge",
    },
];

pub fn default_category_rules() -> Vec<CategoryRule> {
    DEFAULT_CATEGORY_RULES
        .iter()
        .map(|(keyword, category)| CategoryRule::new(keyword, category))
        .collect()
}
