//! Main window state machine.
//!
//! Owns the tab container, the address bar and the view factory. Every user
//! action and every view notification goes through here and comes back out as
//! a list of [`ChromeUpdate`]s for the frontend to apply to its widgets.

use crate::address::AddressBar;
use crate::config::BrowserConfig;
use crate::history::History;
use crate::toolbar::NavAction;
use mega_tabs::{
    short_label, url_label, CloseOutcome, EmbeddedView, TabContainer, TabError, TabId,
    ViewEvent, ViewFactory,
};
use tracing::{debug, error, info};

/// Lifecycle of the main window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// Window is open with at least one tab
    Running,
    /// Window closed, all tabs released
    Closed,
}

/// Widget changes the frontend has to make after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChromeUpdate {
    /// A tab was appended at `index` and is now active
    TabOpened { tab_id: TabId, index: usize },
    /// The tab at `index` was removed; `active` is the index now selected
    TabClosed { index: usize, active: usize },
    /// The tab at `index` became active
    TabSelected { index: usize },
    /// Show this text in the address bar with the cursor at the start
    Address(String),
    /// New tab strip label for the tab at `index`
    Label { index: usize, label: String },
    /// A URL was added to the end of the history list
    HistoryAdded(String),
    /// The history list was emptied
    HistoryCleared,
    /// The window must close
    Close,
}

/// The browser's main window, independent of any GUI toolkit.
pub struct MainWindow<F: ViewFactory> {
    config: BrowserConfig,
    factory: F,
    tabs: TabContainer<F::View>,
    address: AddressBar,
    history: History,
    state: WindowState,
}

impl<F: ViewFactory> MainWindow<F> {
    /// Create the window with a single tab at the configured home URL.
    pub fn new(config: BrowserConfig, factory: F) -> Self {
        let mut window = Self {
            config,
            factory,
            tabs: TabContainer::new(),
            address: AddressBar::new(),
            history: History::new(),
            state: WindowState::Running,
        };

        let home = window.config.home_url.clone();
        let label = window.config.new_tab_label.clone();
        window.open_tab(&home, &label);

        info!("Main window ready");
        window
    }

    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    pub fn state(&self) -> WindowState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == WindowState::Running
    }

    pub fn tabs(&self) -> &TabContainer<F::View> {
        &self.tabs
    }

    pub fn address_bar(&self) -> &AddressBar {
        &self.address
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Record what the user typed without submitting it.
    pub fn edit_address(&mut self, text: &str) {
        self.address.set_text(text);
    }

    /// Open a tab at `url` and make it active.
    pub fn open_tab(&mut self, url: &str, label: &str) -> Vec<ChromeUpdate> {
        if !self.is_running() {
            return Vec::new();
        }

        let tab_id = self.tabs.add_tab(&mut self.factory, url, label);
        let index = self.tabs.len() - 1;
        self.address.show_url(url);

        vec![
            ChromeUpdate::TabOpened { tab_id, index },
            ChromeUpdate::Address(url.to_string()),
        ]
    }

    /// Open a tab at the home URL.
    pub fn new_tab(&mut self) -> Vec<ChromeUpdate> {
        let url = self.config.home_url.clone();
        let label = self.config.new_tab_label.clone();
        self.open_tab(&url, &label)
    }

    /// Close the tab at `index`. Closing the last tab closes the window.
    pub fn close_tab(&mut self, index: usize) -> Result<Vec<ChromeUpdate>, TabError> {
        if !self.is_running() {
            return Ok(Vec::new());
        }

        let updates = match self.tabs.close_tab(index)? {
            CloseOutcome::Removed { active } => {
                let url = self.tabs.active_tab()?.url();
                self.address.show_url(&url);
                vec![
                    ChromeUpdate::TabClosed { index, active },
                    ChromeUpdate::Address(url),
                ]
            }
            CloseOutcome::LastTab => {
                info!("Last tab closed");
                self.close();
                vec![ChromeUpdate::Close]
            }
        };

        self.check_invariant();
        Ok(updates)
    }

    /// Close the tab identified by `tab_id`.
    pub fn close_tab_by_id(&mut self, tab_id: TabId) -> Result<Vec<ChromeUpdate>, TabError> {
        match self.tabs.index_of(tab_id) {
            Some(index) => self.close_tab(index),
            None => {
                debug!("Close requested for unknown {}", tab_id);
                Ok(Vec::new())
            }
        }
    }

    /// Close the active tab.
    pub fn close_active_tab(&mut self) -> Result<Vec<ChromeUpdate>, TabError> {
        if !self.is_running() {
            return Ok(Vec::new());
        }
        let index = self.tabs.active_index().ok_or(TabError::NoActiveTab)?;
        self.close_tab(index)
    }

    /// Make the tab at `index` active and show its URL.
    pub fn select_tab(&mut self, index: usize) -> Result<Vec<ChromeUpdate>, TabError> {
        if !self.is_running() || self.tabs.active_index() == Some(index) {
            return Ok(Vec::new());
        }

        let tab = self.tabs.select(index)?;
        let url = tab.url();
        debug!("Selected {}", tab.id());
        self.address.show_url(&url);

        Ok(vec![
            ChromeUpdate::TabSelected { index },
            ChromeUpdate::Address(url),
        ])
    }

    /// Run a toolbar action.
    pub fn trigger(&mut self, action: NavAction) -> Vec<ChromeUpdate> {
        if !self.is_running() {
            return Vec::new();
        }
        match action {
            NavAction::NewTab => self.new_tab(),
            _ => {
                if !action.forward_to(&self.tabs) {
                    self.check_invariant();
                }
                Vec::new()
            }
        }
    }

    /// Load what the user submitted in the address bar into the active tab.
    ///
    /// Returns the URL that was loaded.
    pub fn submit_address(&mut self, text: &str) -> Option<String> {
        if !self.is_running() {
            return None;
        }

        self.address.set_text(text);
        let url = self.address.submission()?;

        match self.tabs.active_tab_mut() {
            Ok(tab) => {
                tab.load(&url);
                Some(url)
            }
            Err(e) => {
                error!("Dropping address {}: {}", url, e);
                self.check_invariant();
                None
            }
        }
    }

    /// Load the history entry at `index` into the active tab.
    ///
    /// Returns the URL that was loaded.
    pub fn open_history(&mut self, index: usize) -> Option<String> {
        if !self.is_running() {
            return None;
        }

        let url = self.history.get(index)?.to_string();
        match self.tabs.active_tab_mut() {
            Ok(tab) => {
                tab.load(&url);
                Some(url)
            }
            Err(e) => {
                error!("Dropping history entry {}: {}", url, e);
                self.check_invariant();
                None
            }
        }
    }

    /// Forget every visited URL.
    pub fn clear_history(&mut self) -> Vec<ChromeUpdate> {
        if !self.is_running() {
            return Vec::new();
        }
        self.history.clear();
        info!("History cleared");
        vec![ChromeUpdate::HistoryCleared]
    }

    /// Apply a notification from a tab's view.
    pub fn handle_event(&mut self, event: ViewEvent) -> Vec<ChromeUpdate> {
        if !self.is_running() {
            return Vec::new();
        }

        match event {
            ViewEvent::UrlChanged { tab_id, url } => {
                let Some(tab) = self.tabs.get_mut(tab_id) else {
                    debug!("URL change from closed {}", tab_id);
                    return Vec::new();
                };
                tab.set_url(url.clone());

                // Until the page reports a title the tab is named after its URL
                let mut updates = self.set_label(tab_id, url_label(&url));

                if self.history.record(&url) {
                    updates.push(ChromeUpdate::HistoryAdded(url.clone()));
                }

                if self.tabs.is_active(tab_id) {
                    self.address.show_url(&url);
                    updates.push(ChromeUpdate::Address(url));
                } else {
                    debug!("Ignoring URL change from background {}", tab_id);
                }
                updates
            }
            ViewEvent::LoadFinished { tab_id } => {
                let title = self.tabs.get(tab_id).and_then(|tab| tab.view().title());
                match title {
                    Some(title) => self.relabel(tab_id, &title),
                    None => Vec::new(),
                }
            }
            ViewEvent::TitleChanged { tab_id, title } => self.relabel(tab_id, &title),
        }
    }

    /// Close the window and release every tab.
    pub fn close(&mut self) {
        if self.state == WindowState::Closed {
            return;
        }
        self.state = WindowState::Closed;
        self.tabs.clear();
        info!("Main window closed");
    }

    fn relabel(&mut self, tab_id: TabId, title: &str) -> Vec<ChromeUpdate> {
        let title = title.trim();
        if title.is_empty() {
            return Vec::new();
        }

        let label = short_label(title, self.config.label_max_chars);
        self.set_label(tab_id, label)
    }

    fn set_label(&mut self, tab_id: TabId, label: String) -> Vec<ChromeUpdate> {
        if label.is_empty() {
            return Vec::new();
        }
        let Some(index) = self.tabs.index_of(tab_id) else {
            return Vec::new();
        };
        if let Some(tab) = self.tabs.get_mut(tab_id) {
            tab.set_label(label.clone());
        }
        vec![ChromeUpdate::Label { index, label }]
    }

    fn check_invariant(&self) {
        let broken = self.is_running() && self.tabs.is_empty();
        if broken {
            error!("Main window running without tabs");
        }
        debug_assert!(!broken, "main window running without tabs");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type CallLog = Rc<RefCell<Vec<(TabId, String)>>>;

    struct RecordingView {
        id: TabId,
        log: CallLog,
        title: Rc<RefCell<Option<String>>>,
    }

    impl EmbeddedView for RecordingView {
        fn load(&self, url: &str) {
            self.log.borrow_mut().push((self.id, format!("load {url}")));
        }
        fn back(&self) {
            self.log.borrow_mut().push((self.id, "back".into()));
        }
        fn forward(&self) {
            self.log.borrow_mut().push((self.id, "forward".into()));
        }
        fn reload(&self) {
            self.log.borrow_mut().push((self.id, "reload".into()));
        }
        fn current_url(&self) -> Option<String> {
            None
        }
        fn title(&self) -> Option<String> {
            self.title.borrow().clone()
        }
    }

    #[derive(Default)]
    struct RecordingFactory {
        log: CallLog,
        title: Rc<RefCell<Option<String>>>,
    }

    impl ViewFactory for RecordingFactory {
        type View = RecordingView;

        fn create_view(&mut self, tab_id: TabId) -> RecordingView {
            RecordingView {
                id: tab_id,
                log: self.log.clone(),
                title: self.title.clone(),
            }
        }
    }

    fn window() -> (MainWindow<RecordingFactory>, CallLog) {
        let factory = RecordingFactory::default();
        let log = factory.log.clone();
        (MainWindow::new(BrowserConfig::default(), factory), log)
    }

    fn active_id(window: &MainWindow<RecordingFactory>) -> TabId {
        window.tabs().active_tab().unwrap().id()
    }

    #[test]
    fn test_startup_opens_one_home_tab() {
        let (window, log) = window();
        let home = BrowserConfig::default().home_url;

        assert!(window.is_running());
        assert_eq!(window.tabs().len(), 1);
        assert_eq!(*log.borrow(), vec![(active_id(&window), format!("load {home}"))]);
        assert_eq!(window.address_bar().text(), home);
        assert_eq!(window.tabs().active_tab().unwrap().label(), "New Tab");
    }

    #[test]
    fn test_submit_prefixes_default_scheme() {
        let (mut window, log) = window();
        let id = active_id(&window);

        assert_eq!(window.submit_address("example.com").as_deref(), Some("http://example.com"));
        assert_eq!(log.borrow().last(), Some(&(id, "load http://example.com".to_string())));
    }

    #[test]
    fn test_submit_keeps_https() {
        let (mut window, log) = window();

        window.submit_address("https://example.com");
        assert_eq!(log.borrow().last().unwrap().1, "load https://example.com");
    }

    #[test]
    fn test_submit_empty_is_ignored() {
        let (mut window, log) = window();
        let before = log.borrow().len();

        assert_eq!(window.submit_address("   "), None);
        assert_eq!(log.borrow().len(), before);
    }

    #[test]
    fn test_submit_goes_to_active_tab() {
        let (mut window, log) = window();
        window.new_tab();
        window.select_tab(0).unwrap();
        let first = active_id(&window);

        window.submit_address("rust-lang.org");
        assert_eq!(log.borrow().last(), Some(&(first, "load http://rust-lang.org".to_string())));
    }

    #[test]
    fn test_url_change_from_background_tab_is_ignored() {
        let (mut window, _) = window();
        let background = active_id(&window);
        window.new_tab();
        window.edit_address("typing something");

        let updates = window.handle_event(ViewEvent::UrlChanged {
            tab_id: background,
            url: "http://stale.example/".into(),
        });

        assert!(!updates.iter().any(|u| matches!(u, ChromeUpdate::Address(_))));
        assert_eq!(window.address_bar().text(), "typing something");
        // The background tab still remembers where it is
        assert_eq!(
            window.tabs().get(background).unwrap().url(),
            "http://stale.example/"
        );
    }

    #[test]
    fn test_url_change_from_active_tab_updates_address() {
        let (mut window, _) = window();
        let id = active_id(&window);
        window.edit_address("half typed");

        let updates = window.handle_event(ViewEvent::UrlChanged {
            tab_id: id,
            url: "http://example.com/page".into(),
        });

        assert_eq!(
            updates.last(),
            Some(&ChromeUpdate::Address("http://example.com/page".into()))
        );
        assert_eq!(window.address_bar().text(), "http://example.com/page");
        assert_eq!(window.address_bar().cursor(), 0);
    }

    #[test]
    fn test_typing_is_kept_until_active_tab_navigates() {
        let (mut window, _) = window();
        let id = active_id(&window);

        window.edit_address("rust-lang");
        assert_eq!(window.address_bar().text(), "rust-lang");
        assert_eq!(window.address_bar().cursor(), 9);

        window.handle_event(ViewEvent::UrlChanged {
            tab_id: id,
            url: "https://www.rust-lang.org/".into(),
        });
        assert_eq!(window.address_bar().text(), "https://www.rust-lang.org/");
        assert_eq!(window.address_bar().cursor(), 0);
    }

    #[test]
    fn test_url_change_names_tab_until_title_arrives() {
        let (mut window, _) = window();
        let id = active_id(&window);

        let updates = window.handle_event(ViewEvent::UrlChanged {
            tab_id: id,
            url: "https://www.example.com/some/long/path".into(),
        });
        let label = "www.example.com/some/l…".to_string();
        assert_eq!(
            updates[0],
            ChromeUpdate::Label {
                index: 0,
                label: label.clone()
            }
        );
        assert_eq!(window.tabs().active_tab().unwrap().label(), label);

        window.handle_event(ViewEvent::TitleChanged {
            tab_id: id,
            title: "Example".into(),
        });
        assert_eq!(window.tabs().active_tab().unwrap().label(), "Example");
    }

    #[test]
    fn test_history_records_each_url_once() {
        let (mut window, _) = window();
        let first = active_id(&window);
        window.new_tab();
        let second = active_id(&window);

        let updates = window.handle_event(ViewEvent::UrlChanged {
            tab_id: first,
            url: "http://a.example/".into(),
        });
        assert!(updates.contains(&ChromeUpdate::HistoryAdded("http://a.example/".into())));

        window.handle_event(ViewEvent::UrlChanged {
            tab_id: second,
            url: "http://b.example/".into(),
        });
        let updates = window.handle_event(ViewEvent::UrlChanged {
            tab_id: second,
            url: "http://a.example/".into(),
        });
        assert!(!updates.iter().any(|u| matches!(u, ChromeUpdate::HistoryAdded(_))));

        assert_eq!(
            window.history().entries(),
            ["http://a.example/", "http://b.example/"]
        );
    }

    #[test]
    fn test_open_history_loads_into_active_tab() {
        let (mut window, log) = window();
        let id = active_id(&window);
        window.handle_event(ViewEvent::UrlChanged {
            tab_id: id,
            url: "http://a.example/".into(),
        });

        assert_eq!(window.open_history(0).as_deref(), Some("http://a.example/"));
        assert_eq!(
            log.borrow().last(),
            Some(&(id, "load http://a.example/".to_string()))
        );
        assert_eq!(window.open_history(5), None);
    }

    #[test]
    fn test_clear_history() {
        let (mut window, _) = window();
        let id = active_id(&window);
        window.handle_event(ViewEvent::UrlChanged {
            tab_id: id,
            url: "http://a.example/".into(),
        });

        assert_eq!(window.clear_history(), vec![ChromeUpdate::HistoryCleared]);
        assert!(window.history().is_empty());
        assert_eq!(window.open_history(0), None);
    }

    #[test]
    fn test_selecting_tab_shows_its_url() {
        let (mut window, _) = window();
        let first = active_id(&window);
        window.handle_event(ViewEvent::UrlChanged {
            tab_id: first,
            url: "http://first.example/".into(),
        });
        window.new_tab();

        let updates = window.select_tab(0).unwrap();
        assert_eq!(
            updates,
            vec![
                ChromeUpdate::TabSelected { index: 0 },
                ChromeUpdate::Address("http://first.example/".into()),
            ]
        );
        // Selecting the active tab again changes nothing
        assert!(window.select_tab(0).unwrap().is_empty());
        assert!(window.select_tab(9).is_err());
    }

    #[test]
    fn test_toolbar_forwards_to_active_tab() {
        let (mut window, log) = window();
        window.new_tab();
        window.select_tab(0).unwrap();
        let first = active_id(&window);

        window.trigger(NavAction::Back);
        window.trigger(NavAction::Forward);
        window.trigger(NavAction::Reload);

        let calls: Vec<_> = log.borrow().iter().rev().take(3).cloned().collect();
        assert_eq!(
            calls,
            vec![
                (first, "reload".to_string()),
                (first, "forward".to_string()),
                (first, "back".to_string()),
            ]
        );
    }

    #[test]
    fn test_new_tab_action_opens_home_tab() {
        let (mut window, _) = window();
        let updates = window.trigger(NavAction::NewTab);

        assert_eq!(window.tabs().len(), 2);
        let id = active_id(&window);
        assert_eq!(
            updates[0],
            ChromeUpdate::TabOpened {
                tab_id: id,
                index: 1
            }
        );
    }

    #[test]
    fn test_closing_last_tab_closes_window() {
        let (mut window, log) = window();

        let updates = window.close_tab(0).unwrap();
        assert_eq!(updates, vec![ChromeUpdate::Close]);
        assert_eq!(window.state(), WindowState::Closed);
        assert!(window.tabs().is_empty());

        // Nothing reaches a view once closed
        let before = log.borrow().len();
        assert!(window.trigger(NavAction::Reload).is_empty());
        assert!(window.trigger(NavAction::NewTab).is_empty());
        assert_eq!(window.submit_address("example.com"), None);
        assert_eq!(log.borrow().len(), before);
    }

    #[test]
    fn test_close_active_tab_shows_neighbour_url() {
        let (mut window, _) = window();
        let first = active_id(&window);
        window.handle_event(ViewEvent::UrlChanged {
            tab_id: first,
            url: "http://first.example/".into(),
        });
        window.new_tab();

        let updates = window.close_active_tab().unwrap();
        assert_eq!(
            updates,
            vec![
                ChromeUpdate::TabClosed {
                    index: 1,
                    active: 0
                },
                ChromeUpdate::Address("http://first.example/".into()),
            ]
        );
        assert!(window.is_running());
        assert_eq!(active_id(&window), first);
    }

    #[test]
    fn test_close_by_id() {
        let (mut window, _) = window();
        let first = active_id(&window);
        window.new_tab();

        window.close_tab_by_id(first).unwrap();
        assert_eq!(window.tabs().len(), 1);
        assert!(window.tabs().get(first).is_none());
        // Unknown tabs are ignored
        assert!(window.close_tab_by_id(first).unwrap().is_empty());
    }

    #[test]
    fn test_explicit_close() {
        let (mut window, _) = window();
        window.new_tab();

        window.close();
        assert_eq!(window.state(), WindowState::Closed);
        assert!(window.tabs().is_empty());

        // Closing twice is harmless
        window.close();
        assert_eq!(window.state(), WindowState::Closed);
    }

    #[test]
    fn test_never_zero_tabs_while_running() {
        // Small LCG so every run walks the same sequences
        let mut seed: u64 = 0x5eed;
        let mut next = move || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 33) as usize
        };

        for _ in 0..50 {
            let (mut window, _) = window();
            for _ in 0..40 {
                if next() % 3 == 0 {
                    window.new_tab();
                } else {
                    let index = next() % window.tabs().len();
                    let updates = window.close_tab(index).unwrap();
                    if updates == vec![ChromeUpdate::Close] {
                        break;
                    }
                }
                assert!(window.is_running());
                assert!(!window.tabs().is_empty());
                assert!(window.tabs().active_tab().is_ok());
            }
        }
    }

    #[test]
    fn test_load_finished_uses_page_title() {
        let factory = RecordingFactory::default();
        let title = factory.title.clone();
        let mut window = MainWindow::new(BrowserConfig::default(), factory);
        let id = active_id(&window);

        *title.borrow_mut() = Some("A rather long page title indeed".into());
        let updates = window.handle_event(ViewEvent::LoadFinished { tab_id: id });

        let label = "A rather long page t…".to_string();
        assert_eq!(
            updates,
            vec![ChromeUpdate::Label {
                index: 0,
                label: label.clone()
            }]
        );
        assert_eq!(window.tabs().active_tab().unwrap().label(), label);
    }

    #[test]
    fn test_empty_title_keeps_label() {
        let (mut window, _) = window();
        let id = active_id(&window);

        let updates = window.handle_event(ViewEvent::TitleChanged {
            tab_id: id,
            title: "  ".into(),
        });
        assert!(updates.is_empty());
        assert_eq!(window.tabs().active_tab().unwrap().label(), "New Tab");

        let updates = window.handle_event(ViewEvent::TitleChanged {
            tab_id: id,
            title: "Docs".into(),
        });
        assert_eq!(
            updates,
            vec![ChromeUpdate::Label {
                index: 0,
                label: "Docs".into()
            }]
        );
    }
}
