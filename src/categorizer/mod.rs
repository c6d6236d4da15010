use crate::constants::UNCATEGORIZED_CATEGORY;
use crate::models::rule::{default_category_rules, DEFAULT_TITLE_SUFFIXES};
use crate::models::{CategoryRule, TitleSuffixRule};

/// Separator used by most applications between document and app name.
const TITLE_SEPARATOR: &str = " - ";

/// Derives the details text and the category of a window.
///
/// Both operations are pure functions of their inputs: the rule lists are
/// fixed at construction and never mutated.
pub struct Categorizer {
    rules: Vec<CategoryRule>,
    suffixes: Vec<TitleSuffixRule>,
}

impl Default for Categorizer {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Categorizer {
    /// `user_rules` are tried before the built-in rules, so they override them.
    pub fn new(user_rules: Vec<CategoryRule>) -> Self {
        let mut rules = user_rules;
        rules.extend(default_category_rules());

        Self {
            rules,
            suffixes: DEFAULT_TITLE_SUFFIXES.to_vec(),
        }
    }

    /// Extract the meaningful part of a window title (document or page name).
    pub fn details(&self, window_title: &str, process_name: &str) -> String {
        let process_lower = process_name.to_lowercase();

        for rule in &self.suffixes {
            if rule.process != process_lower {
                continue;
            }
            if let Some(pos) = window_title.find(rule.suffix) {
                if let Some(prefix) = window_title.get(..pos) {
                    return prefix.to_string();
                }
            }
        }

        match window_title.rsplit_once(TITLE_SEPARATOR) {
            Some((prefix, _app)) => prefix.to_string(),
            None => window_title.to_string(),
        }
    }

    /// First rule whose keyword occurs in the process name, title or details wins.
    pub fn category(&self, window_title: &str, process_name: &str, details: &str) -> String {
        let haystacks = [
            process_name.to_lowercase(),
            window_title.to_lowercase(),
            details.to_lowercase(),
        ];

        self.rules
            .iter()
            .find(|rule| {
                let keyword = rule.keyword.to_lowercase();
                haystacks.iter().any(|text| Self::pattern_matches(&keyword, text))
            })
            .map_or_else(|| UNCATEGORIZED_CATEGORY.to_string(), |rule| rule.category.clone())
    }

    /// Case-insensitive substring match; `*` in the pattern matches any run of characters.
    fn pattern_matches(pattern: &str, text: &str) -> bool {
        let pattern_lower = pattern.to_lowercase();
        let text_lower = text.to_lowercase();

        if pattern_lower.contains('*') {
            let mut rest = text_lower.as_str();
            for part in pattern_lower.split('*') {
                if part.is_empty() {
                    continue;
                }
                match rest.find(part) {
                    Some(found) => rest = rest.get(found + part.len()..).unwrap_or_default(),
                    None => return false,
                }
            }
            true
        } else {
            text_lower.contains(&pattern_lower)
        }
    }
}
