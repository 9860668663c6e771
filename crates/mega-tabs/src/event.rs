//! Notifications delivered from embedded views to the main window.

use std::fmt;

/// Unique identifier for a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabId(pub u64);

impl TabId {
    /// Create a new tab ID.
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tab({})", self.0)
    }
}

/// Change notifications emitted by a tab's embedded view.
///
/// Views never hold a reference to their tab. They only know the `TabId`
/// they were created for, and the main window looks the tab up again
/// when the notification is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// The view's current URL changed
    UrlChanged { tab_id: TabId, url: String },
    /// The view finished loading a page
    LoadFinished { tab_id: TabId },
    /// The page title changed
    TitleChanged { tab_id: TabId, title: String },
}

impl ViewEvent {
    /// The tab whose view emitted this notification.
    pub fn tab_id(&self) -> TabId {
        match self {
            Self::UrlChanged { tab_id, .. }
            | Self::LoadFinished { tab_id }
            | Self::TitleChanged { tab_id, .. } => *tab_id,
        }
    }
}
