//! Navigation toolbar actions.

use mega_tabs::{EmbeddedView, TabContainer};
use tracing::{debug, error};

/// Toolbar controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    /// Go back in the active tab
    Back,
    /// Go forward in the active tab
    Forward,
    /// Reload the active tab
    Reload,
    /// Open a tab at the home URL
    NewTab,
}

impl NavAction {
    /// Forward a navigation action to the active tab's view.
    ///
    /// Returns `false` when the action did not reach a view: either there is no
    /// active tab or the action is not a navigation (`NewTab`).
    pub fn forward_to<V: EmbeddedView>(self, tabs: &TabContainer<V>) -> bool {
        let tab = match tabs.active_tab() {
            Ok(tab) => tab,
            Err(e) => {
                error!("Ignoring {:?}: {}", self, e);
                return false;
            }
        };

        debug!("{:?} on {}", self, tab.id());
        match self {
            Self::Back => tab.view().back(),
            Self::Forward => tab.view().forward(),
            Self::Reload => tab.view().reload(),
            Self::NewTab => return false,
        }
        true
    }
}
