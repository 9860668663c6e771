//! Mega Browser Tabs
//!
//! The tab model shared by the shell and the GTK frontend:
//! - Tab identity and per-tab state
//! - The ordered tab container with its active tab reference
//! - The contract every embedded web view must satisfy
//! - Notifications emitted by views, keyed by tab

mod container;
mod event;
mod tab;
mod view;

pub use container::{CloseOutcome, TabContainer, TabError};
pub use event::{TabId, ViewEvent};
pub use tab::{short_label, url_label, Tab};
pub use view::{EmbeddedView, ViewFactory};
