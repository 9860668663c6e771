//! WebKitGTK views.

use crossbeam_channel::Sender;
use gtk4::prelude::*;
use mega_tabs::{EmbeddedView, TabId, ViewEvent, ViewFactory};
use std::rc::Rc;
use tracing::debug;
use webkit6::prelude::*;
use webkit6::{LoadEvent, NetworkSession, WebView};

/// Callback that makes the main loop drain queued view events
pub type Wake = Rc<dyn Fn()>;

/// A tab's WebKit view.
#[derive(Clone)]
pub struct GtkView {
    webview: WebView,
}

impl GtkView {
    /// The widget to put in the tab strip.
    pub fn widget(&self) -> &WebView {
        &self.webview
    }
}

impl EmbeddedView for GtkView {
    fn load(&self, url: &str) {
        self.webview.load_uri(url);
    }

    fn back(&self) {
        self.webview.go_back();
    }

    fn forward(&self) {
        self.webview.go_forward();
    }

    fn reload(&self) {
        self.webview.reload();
    }

    fn current_url(&self) -> Option<String> {
        self.webview.uri().map(|u| u.to_string())
    }

    fn title(&self) -> Option<String> {
        self.webview.title().map(|t| t.to_string())
    }
}

/// Builds WebKit views that report their changes as [`ViewEvent`]s.
///
/// Signal handlers only capture the tab ID, the event queue and the wake
/// callback. They never touch the main window directly, so a view that emits
/// synchronously from inside `load_uri` cannot re-enter it.
pub struct GtkViewFactory {
    /// Shared in-memory session; nothing is written to disk
    session: NetworkSession,
    events: Sender<ViewEvent>,
    wake: Wake,
}

impl GtkViewFactory {
    pub fn new(events: Sender<ViewEvent>, wake: Wake) -> Self {
        Self {
            session: NetworkSession::new_ephemeral(),
            events,
            wake,
        }
    }
}

/// Queue an event and wake the main loop.
fn notifier(events: Sender<ViewEvent>, wake: Wake) -> impl Fn(ViewEvent) {
    move |event| {
        if events.send(event).is_ok() {
            wake();
        }
    }
}

impl ViewFactory for GtkViewFactory {
    type View = GtkView;

    fn create_view(&mut self, tab_id: TabId) -> GtkView {
        let webview = WebView::builder().network_session(&self.session).build();

        if let Some(settings) = webkit6::prelude::WebViewExt::settings(&webview) {
            settings.set_enable_javascript(true);
            settings.set_enable_smooth_scrolling(true);
            settings.set_enable_developer_extras(false);
            settings.set_enable_media(true);
        }

        webview.set_vexpand(true);
        webview.set_hexpand(true);

        {
            let notify = notifier(self.events.clone(), self.wake.clone());
            webview.connect_uri_notify(move |wv| {
                if let Some(uri) = wv.uri() {
                    notify(ViewEvent::UrlChanged {
                        tab_id,
                        url: uri.to_string(),
                    });
                }
            });
        }

        {
            let notify = notifier(self.events.clone(), self.wake.clone());
            webview.connect_title_notify(move |wv| {
                if let Some(title) = wv.title() {
                    notify(ViewEvent::TitleChanged {
                        tab_id,
                        title: title.to_string(),
                    });
                }
            });
        }

        {
            let notify = notifier(self.events.clone(), self.wake.clone());
            webview.connect_load_changed(move |_, event| {
                if event == LoadEvent::Finished {
                    notify(ViewEvent::LoadFinished { tab_id });
                }
            });
        }

        debug!("Created web view for {}", tab_id);
        GtkView { webview }
    }
}
