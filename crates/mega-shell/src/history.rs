//! In-session history of visited URLs.
//!
//! Kept in memory only and gone when the window closes.

use std::collections::HashSet;

/// Visited URLs in first-visit order, each listed once.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<String>,
    seen: HashSet<String>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visit. Returns `true` if the URL was not listed yet.
    pub fn record(&mut self, url: &str) -> bool {
        if url.is_empty() || !self.seen.insert(url.to_string()) {
            return false;
        }
        self.entries.push(url.to_string());
        true
    }

    /// URL at `index` in first-visit order.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every visit.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_first_visit_order() {
        let mut history = History::new();

        assert!(history.record("http://a/"));
        assert!(history.record("http://b/"));
        assert!(!history.record("http://a/"));
        assert!(history.record("http://c/"));

        assert_eq!(history.entries(), ["http://a/", "http://b/", "http://c/"]);
        assert_eq!(history.get(1), Some("http://b/"));
        assert_eq!(history.get(3), None);
    }

    #[test]
    fn test_empty_url_is_not_recorded() {
        let mut history = History::new();
        assert!(!history.record(""));
        assert!(history.is_empty());
    }

    #[test]
    fn test_clear_allows_recording_again() {
        let mut history = History::new();
        history.record("http://a/");

        history.clear();
        assert!(history.is_empty());
        assert!(history.record("http://a/"));
        assert_eq!(history.len(), 1);
    }
}
