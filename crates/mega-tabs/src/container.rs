//! Ordered tab container with a single active tab reference.

use crate::event::TabId;
use crate::tab::{next_tab_id, Tab};
use crate::view::{EmbeddedView, ViewFactory};
use thiserror::Error;
use tracing::info;

/// Errors returned by the tab container.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TabError {
    #[error("No active tab")]
    NoActiveTab,

    #[error("Tab index {index} out of range ({len} tabs open)")]
    OutOfRange { index: usize, len: usize },
}

/// Result of asking the container to close a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The tab was removed; `active` is the index now selected
    Removed { active: usize },
    /// The tab is the last one and was kept; the window should close instead
    LastTab,
}

/// Holds every open tab in strip order.
///
/// The active tab is tracked by index and never owns anything.
pub struct TabContainer<V> {
    /// Tabs in tab strip order
    tabs: Vec<Tab<V>>,
    /// Index of the active tab, `None` only while empty
    active: Option<usize>,
}

impl<V: EmbeddedView> TabContainer<V> {
    /// Create an empty container.
    pub fn new() -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
        }
    }

    /// Open a new tab, start loading `url` and make it active.
    pub fn add_tab<F>(&mut self, factory: &mut F, url: &str, label: &str) -> TabId
    where
        F: ViewFactory<View = V>,
    {
        let id = next_tab_id();
        let view = factory.create_view(id);

        let mut tab = Tab::new(id, view, url, label);
        tab.load(url);

        self.tabs.push(tab);
        self.active = Some(self.tabs.len() - 1);

        info!("Opened {} at {}", id, url);
        id
    }

    /// Close the tab at `index`.
    ///
    /// The last remaining tab is never removed. If the closed tab was active,
    /// the tab before it becomes active (or the new first tab when index 0
    /// was closed).
    pub fn close_tab(&mut self, index: usize) -> Result<CloseOutcome, TabError> {
        let len = self.tabs.len();
        if index >= len {
            return Err(TabError::OutOfRange { index, len });
        }
        if len == 1 {
            return Ok(CloseOutcome::LastTab);
        }

        let tab = self.tabs.remove(index);
        let active = self.active.unwrap_or(0);
        let new_active = if active > index || (active == index && index > 0) {
            active - 1
        } else {
            active
        };
        self.active = Some(new_active);

        info!("Closed {} (now {} tabs)", tab.id(), self.tabs.len());
        Ok(CloseOutcome::Removed { active: new_active })
    }

    /// Make the tab at `index` active.
    pub fn select(&mut self, index: usize) -> Result<&Tab<V>, TabError> {
        let len = self.tabs.len();
        if index >= len {
            return Err(TabError::OutOfRange { index, len });
        }
        self.active = Some(index);
        Ok(&self.tabs[index])
    }

    /// Get the active tab.
    pub fn active_tab(&self) -> Result<&Tab<V>, TabError> {
        self.active
            .and_then(|i| self.tabs.get(i))
            .ok_or(TabError::NoActiveTab)
    }

    /// Get the active tab mutably.
    pub fn active_tab_mut(&mut self) -> Result<&mut Tab<V>, TabError> {
        match self.active {
            Some(i) => self.tabs.get_mut(i).ok_or(TabError::NoActiveTab),
            None => Err(TabError::NoActiveTab),
        }
    }

    /// Index of the active tab.
    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Check whether `id` is the active tab.
    pub fn is_active(&self, id: TabId) -> bool {
        self.active_tab().map(|t| t.id() == id).unwrap_or(false)
    }

    /// Position of a tab in the strip.
    pub fn index_of(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|t| t.id() == id)
    }

    /// Get a tab by ID.
    pub fn get(&self, id: TabId) -> Option<&Tab<V>> {
        self.tabs.iter().find(|t| t.id() == id)
    }

    /// Get a mutable tab by ID.
    pub fn get_mut(&mut self, id: TabId) -> Option<&mut Tab<V>> {
        self.tabs.iter_mut().find(|t| t.id() == id)
    }

    /// Get a tab by position.
    pub fn at(&self, index: usize) -> Option<&Tab<V>> {
        self.tabs.get(index)
    }

    /// Iterate over tabs in strip order.
    pub fn iter(&self) -> impl Iterator<Item = &Tab<V>> {
        self.tabs.iter()
    }

    /// Get the number of open tabs.
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    /// Drop every tab, releasing their views.
    pub fn clear(&mut self) {
        info!("Releasing {} tabs", self.tabs.len());
        self.tabs.clear();
        self.active = None;
    }
}

impl<V: EmbeddedView> Default for TabContainer<V> {
    fn default() -> Self {
        Self::new()
    }
}
