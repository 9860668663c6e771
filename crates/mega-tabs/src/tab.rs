//! Tab state.

use crate::event::TabId;
use crate::view::EmbeddedView;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Global tab ID counter
static NEXT_TAB_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a new unique tab ID.
pub(crate) fn next_tab_id() -> TabId {
    TabId::new(NEXT_TAB_ID.fetch_add(1, Ordering::Relaxed))
}

/// A browser tab: one embedded view plus what the tab strip shows for it.
pub struct Tab<V> {
    /// Unique identifier
    id: TabId,
    /// The embedded web view
    view: V,
    /// Text shown in the tab strip
    label: String,
    /// Last URL requested or reported for this tab
    url: String,
}

impl<V: EmbeddedView> Tab<V> {
    /// Create a tab around an already constructed view.
    pub(crate) fn new(id: TabId, view: V, url: &str, label: &str) -> Self {
        Self {
            id,
            view,
            label: label.to_string(),
            url: url.to_string(),
        }
    }

    /// Get the tab ID.
    pub fn id(&self) -> TabId {
        self.id
    }

    /// Get the embedded view.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Get the tab strip label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Set the tab strip label.
    pub fn set_label(&mut self, label: String) {
        self.label = label;
    }

    /// Last known URL. Prefers what the view reports over what was requested.
    pub fn url(&self) -> String {
        self.view.current_url().unwrap_or_else(|| self.url.clone())
    }

    /// Record a URL reported by the view.
    pub fn set_url(&mut self, url: String) {
        self.url = url;
    }

    /// Navigate to a URL.
    pub fn load(&mut self, url: &str) {
        debug!("{} loading {}", self.id, url);
        self.url = url.to_string();
        self.view.load(url);
    }
}

impl<V> Drop for Tab<V> {
    fn drop(&mut self) {
        debug!("Releasing view of {}", self.id);
    }
}

/// Shorten a page title for the tab strip.
///
/// Titles longer than `max_chars` characters are cut and get a trailing `…`.
pub fn short_label(title: &str, max_chars: usize) -> String {
    if title.chars().count() > max_chars {
        let mut label: String = title.chars().take(max_chars).collect();
        label.push('…');
        label
    } else {
        title.to_string()
    }
}

/// URL labels longer than this are shortened
const URL_LABEL_MAX_CHARS: usize = 25;

/// Characters kept from a shortened URL label
const URL_LABEL_KEEP_CHARS: usize = 22;

/// Label for a tab whose page has not reported a title yet.
///
/// Drops the `http://`/`https://` scheme and cuts long addresses to 22
/// characters followed by `…`.
pub fn url_label(url: &str) -> String {
    let bare = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);

    if bare.chars().count() > URL_LABEL_MAX_CHARS {
        short_label(bare, URL_LABEL_KEEP_CHARS)
    } else {
        bare.to_string()
    }
}
