//! Address bar model.

/// Scheme prepended to addresses typed without one
pub const DEFAULT_SCHEME: &str = "http://";

/// Prefixes accepted as-is
const KNOWN_PREFIXES: &[&str] = &["http://", "https://", "file://", "about:"];

/// Turn typed text into a loadable URL.
///
/// Surrounding whitespace is dropped and empty input yields `None`. Text without
/// a known scheme gets [`DEFAULT_SCHEME`] in front. Nothing else is validated;
/// the engine shows its own error page for addresses it cannot load.
pub fn normalize_url(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let lower = text.to_ascii_lowercase();
    if KNOWN_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        Some(text.to_string())
    } else {
        Some(format!("{DEFAULT_SCHEME}{text}"))
    }
}

/// Text and cursor of the address bar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressBar {
    text: String,
    /// Cursor position in characters
    cursor: usize,
}

impl AddressBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the text as the user typed it, cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.chars().count();
    }

    /// Show a URL reported by the active tab, cursor back at the start so the
    /// scheme and host stay visible.
    pub fn show_url(&mut self, url: &str) {
        self.text = url.to_string();
        self.cursor = 0;
    }

    /// The URL to load for the current text, if any.
    pub fn submission(&self) -> Option<String> {
        normalize_url(&self.text)
    }
}
