//! Contract for the embedded web-rendering surface.
//!
//! The engine behind a view (WebKitGTK in the GTK frontend) owns navigation,
//! history, rendering and error pages. The shell only forwards to it.

use crate::event::TabId;

/// Operations the shell needs from an embedded web view.
///
/// Change notifications are not part of this trait: a view reports them as
/// [`ViewEvent`](crate::ViewEvent)s through whatever plumbing its
/// [`ViewFactory`] wired up when the view was created.
pub trait EmbeddedView {
    /// Start loading `url`, superseding any load in flight.
    fn load(&self, url: &str);

    /// Go back in the view's history.
    fn back(&self);

    /// Go forward in the view's history.
    fn forward(&self);

    /// Reload the current page.
    fn reload(&self);

    /// The URL currently displayed, if any.
    fn current_url(&self) -> Option<String>;

    /// The current page title, if any.
    fn title(&self) -> Option<String>;
}

/// Creates embedded views and registers their notification plumbing.
pub trait ViewFactory {
    type View: EmbeddedView;

    /// Create a view for the tab identified by `tab_id`.
    ///
    /// Every notification the returned view emits must carry `tab_id`.
    fn create_view(&mut self, tab_id: TabId) -> Self::View;
}
