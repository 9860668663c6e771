//! Mega Browser window
//!
//! Features:
//! - Tab strip with per-tab close buttons
//! - Toolbar with back, forward, reload, address bar and new tab
//! - Address bar follows the active tab only
//! - Tab labels follow page titles
//! - Side panel listing the pages visited this session
//! - Keyboard control (Ctrl+T/W/R/L, Alt+Left/Right)

use crate::view::{GtkViewFactory, Wake};
use crossbeam_channel::{unbounded, Receiver};
use gtk4::prelude::*;
use gtk4::{
    gdk::ModifierType, glib, pango::EllipsizeMode, Align, Application, ApplicationWindow,
    Box as GtkBox, Button, Entry, EventControllerKey, Label, ListBox, Notebook, Orientation,
    PolicyType, ScrolledWindow, SelectionMode,
};
use mega_shell::{BrowserConfig, ChromeUpdate, MainWindow, NavAction};
use mega_tabs::{TabId, ViewEvent};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};
use tracing::{debug, info, warn};

/// Browser window state
struct Chrome {
    window: ApplicationWindow,
    notebook: Notebook,
    address_bar: Entry,
    history_list: ListBox,
    /// Tab strip labels by tab
    labels: RefCell<HashMap<TabId, Label>>,
    browser: RefCell<MainWindow<GtkViewFactory>>,
    /// Notifications queued by the views
    events: Receiver<ViewEvent>,
    /// Set while widgets are being brought in line with the main window
    syncing: Cell<bool>,
}

/// Run the browser
pub fn run_webview(config: BrowserConfig) -> anyhow::Result<()> {
    info!("Starting Mega Browser");

    let app = Application::builder()
        .application_id("org.mega.browser")
        .build();

    app.connect_activate(move |app| {
        build_ui(app, config.clone());
    });

    // No command line options: keep GTK from parsing argv
    let exit = app.run_with_args::<&str>(&[]);
    if exit != glib::ExitCode::SUCCESS {
        anyhow::bail!("GTK application exited with {:?}", exit);
    }

    Ok(())
}

fn build_ui(app: &Application, config: BrowserConfig) {
    let window = ApplicationWindow::builder()
        .application(app)
        .title(config.window_title.as_str())
        .default_width(config.width)
        .default_height(config.height)
        .build();

    let main_box = GtkBox::new(Orientation::Vertical, 0);

    // === TOOLBAR ===
    let toolbar = GtkBox::new(Orientation::Horizontal, 4);
    toolbar.set_margin_start(6);
    toolbar.set_margin_end(6);
    toolbar.set_margin_top(4);
    toolbar.set_margin_bottom(4);

    let back_btn = tool_button("⬅️", "Back (Alt+Left)");
    let forward_btn = tool_button("➡️", "Forward (Alt+Right)");
    let reload_btn = tool_button("🔄", "Reload (Ctrl+R)");
    let new_tab_btn = tool_button("➕ New Tab", "New tab (Ctrl+T)");

    let address_bar = Entry::new();
    address_bar.set_hexpand(true);
    address_bar.set_placeholder_text(Some("Enter URL..."));

    toolbar.append(&back_btn);
    toolbar.append(&forward_btn);
    toolbar.append(&reload_btn);
    toolbar.append(&address_bar);
    toolbar.append(&new_tab_btn);
    main_box.append(&toolbar);

    let content_box = GtkBox::new(Orientation::Horizontal, 0);
    content_box.set_vexpand(true);

    // === HISTORY PANEL ===
    let history_panel = GtkBox::new(Orientation::Vertical, 4);
    history_panel.set_margin_start(6);
    history_panel.set_margin_end(6);
    history_panel.set_margin_bottom(4);

    let toggle_history_btn = Button::with_label("Hide History");
    let clear_history_btn = Button::with_label("Clear History");

    let history_list = ListBox::new();
    history_list.set_selection_mode(SelectionMode::Single);
    // Entries load on double click
    history_list.set_activate_on_single_click(false);

    let history_scroll = ScrolledWindow::builder()
        .hscrollbar_policy(PolicyType::Never)
        .vexpand(true)
        .width_request(220)
        .child(&history_list)
        .build();

    history_panel.append(&toggle_history_btn);
    history_panel.append(&clear_history_btn);
    history_panel.append(&history_scroll);
    content_box.append(&history_panel);

    // === TAB STRIP + CONTENT ===
    let notebook = Notebook::new();
    notebook.set_scrollable(true);
    notebook.set_vexpand(true);
    notebook.set_hexpand(true);
    content_box.append(&notebook);
    main_box.append(&content_box);

    let (events_tx, events_rx) = unbounded();

    let chrome = Rc::new_cyclic(|weak: &Weak<Chrome>| {
        let wake: Wake = {
            let weak = weak.clone();
            Rc::new(move || schedule_drain(&weak))
        };
        let factory = GtkViewFactory::new(events_tx, wake);

        Chrome {
            window: window.clone(),
            notebook: notebook.clone(),
            address_bar: address_bar.clone(),
            history_list: history_list.clone(),
            labels: RefCell::new(HashMap::new()),
            browser: RefCell::new(MainWindow::new(config, factory)),
            events: events_rx,
            syncing: Cell::new(false),
        }
    });

    // Show the tab the main window opened on startup
    chrome.attach_existing_tabs();

    // === Toolbar ===
    for (button, action) in [
        (&back_btn, NavAction::Back),
        (&forward_btn, NavAction::Forward),
        (&reload_btn, NavAction::Reload),
        (&new_tab_btn, NavAction::NewTab),
    ] {
        let c = chrome.clone();
        button.connect_clicked(move |_| c.run(action));
    }

    // === Address bar ===
    {
        let c = chrome.clone();
        address_bar.connect_activate(move |entry| {
            let text = entry.text().to_string();
            let loaded = c.browser.borrow_mut().submit_address(&text);
            match loaded {
                Some(url) => info!("Navigating to {}", url),
                None => debug!("Nothing to load for {:?}", text),
            }
        });
    }
    {
        let c = chrome.clone();
        address_bar.connect_changed(move |entry| {
            // Only keystrokes, not text set from the main window
            if c.syncing.get() {
                return;
            }
            if let Ok(mut browser) = c.browser.try_borrow_mut() {
                browser.edit_address(&entry.text());
            }
        });
    }

    // === History ===
    {
        let c = chrome.clone();
        history_list.connect_row_activated(move |_, row| {
            let Ok(index) = usize::try_from(row.index()) else {
                return;
            };
            let loaded = c.browser.borrow_mut().open_history(index);
            if let Some(url) = loaded {
                info!("Opening {} from history", url);
            }
        });
    }
    {
        let clear_btn = clear_history_btn.clone();
        toggle_history_btn.connect_clicked(move |button| {
            let show = !history_scroll.is_visible();
            history_scroll.set_visible(show);
            clear_btn.set_visible(show);
            button.set_label(if show { "Hide History" } else { "Show History" });
        });
    }
    {
        let c = chrome.clone();
        clear_history_btn.connect_clicked(move |_| {
            let updates = c.browser.borrow_mut().clear_history();
            c.apply(updates);
        });
    }

    // === Tab selection ===
    {
        let c = chrome.clone();
        notebook.connect_switch_page(move |_, _, page_num| {
            if c.syncing.get() {
                return;
            }
            let result = match c.browser.try_borrow_mut() {
                Ok(mut browser) => browser.select_tab(page_num as usize),
                Err(_) => return,
            };
            match result {
                Ok(updates) => c.apply(updates),
                Err(e) => warn!("Cannot select page {}: {}", page_num, e),
            }
        });
    }

    // === KEYBOARD SHORTCUTS ===
    let key_controller = EventControllerKey::new();
    {
        let c = chrome.clone();
        key_controller.connect_key_pressed(move |_, key, _, modifiers| {
            if modifiers.contains(ModifierType::CONTROL_MASK) {
                match key.name().as_deref() {
                    // Ctrl+T: New tab
                    Some("t") => {
                        c.run(NavAction::NewTab);
                        return glib::Propagation::Stop;
                    }
                    // Ctrl+W: Close tab
                    Some("w") => {
                        let result = c.browser.borrow_mut().close_active_tab();
                        match result {
                            Ok(updates) => c.apply(updates),
                            Err(e) => warn!("Cannot close tab: {}", e),
                        }
                        return glib::Propagation::Stop;
                    }
                    // Ctrl+R: Reload
                    Some("r") => {
                        c.run(NavAction::Reload);
                        return glib::Propagation::Stop;
                    }
                    // Ctrl+L: Focus URL bar
                    Some("l") => {
                        c.address_bar.grab_focus();
                        c.address_bar.select_region(0, -1);
                        return glib::Propagation::Stop;
                    }
                    _ => {}
                }
            }
            if modifiers.contains(ModifierType::ALT_MASK) {
                match key.name().as_deref() {
                    Some("Left") => {
                        c.run(NavAction::Back);
                        return glib::Propagation::Stop;
                    }
                    Some("Right") => {
                        c.run(NavAction::Forward);
                        return glib::Propagation::Stop;
                    }
                    _ => {}
                }
            }
            glib::Propagation::Proceed
        });
    }
    window.add_controller(key_controller);

    // === Release tabs on close ===
    {
        let c = chrome.clone();
        window.connect_close_request(move |_| {
            if let Ok(mut browser) = c.browser.try_borrow_mut() {
                browser.close();
            }
            glib::Propagation::Proceed
        });
    }

    // CSS
    let css = gtk4::CssProvider::new();
    css.load_from_data(
        r#"
        .tab-close { min-width: 16px; min-height: 16px; padding: 0; }
        notebook header tab { padding: 2px 8px; }
    "#,
    );
    if let Some(display) = gtk4::gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &css,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }

    window.set_child(Some(&main_box));
    window.present();

    info!("Browser ready");
}

fn tool_button(label: &str, tooltip: &str) -> Button {
    let button = Button::with_label(label);
    button.set_tooltip_text(Some(tooltip));
    button.set_has_frame(false);
    button
}

/// Queue a drain of the view events on the main loop.
///
/// Always deferred: the view that emitted may still be inside a call made by
/// the main window.
fn schedule_drain(weak: &Weak<Chrome>) {
    let weak = weak.clone();
    glib::idle_add_local_once(move || {
        if let Some(chrome) = weak.upgrade() {
            chrome.drain_events();
        }
    });
}

impl Chrome {
    /// Run a toolbar action against the main window.
    fn run(self: &Rc<Self>, action: NavAction) {
        let updates = self.browser.borrow_mut().trigger(action);
        self.apply(updates);
    }

    /// Close the tab whose close button was clicked.
    fn close_tab(self: &Rc<Self>, tab_id: TabId) {
        let result = self.browser.borrow_mut().close_tab_by_id(tab_id);
        match result {
            Ok(updates) => self.apply(updates),
            Err(e) => warn!("Cannot close {}: {}", tab_id, e),
        }
    }

    /// Feed queued view notifications to the main window, in order.
    fn drain_events(self: &Rc<Self>) {
        let events: Vec<ViewEvent> = self.events.try_iter().collect();
        for event in events {
            let updates = match self.browser.try_borrow_mut() {
                Ok(mut browser) => browser.handle_event(event),
                Err(_) => {
                    warn!("Main window busy, dropping {:?}", event);
                    continue;
                }
            };
            self.apply(updates);
        }
    }

    /// Add notebook pages for tabs opened before the widgets were wired.
    fn attach_existing_tabs(self: &Rc<Self>) {
        let opened: Vec<ChromeUpdate> = {
            let browser = self.browser.borrow();
            browser
                .tabs()
                .iter()
                .enumerate()
                .map(|(index, tab)| ChromeUpdate::TabOpened {
                    tab_id: tab.id(),
                    index,
                })
                .collect()
        };
        let address = self.browser.borrow().address_bar().text().to_string();

        self.apply(opened);
        self.apply(vec![ChromeUpdate::Address(address)]);
    }

    /// Bring the widgets in line with the main window.
    ///
    /// Must be called without a borrow on `browser` held: notebook changes
    /// emit signals that borrow it again.
    fn apply(self: &Rc<Self>, updates: Vec<ChromeUpdate>) {
        for update in updates {
            match update {
                ChromeUpdate::TabOpened { tab_id, index } => self.add_page(tab_id, index),
                ChromeUpdate::TabClosed { index, active } => {
                    self.sync(|| {
                        self.notebook.remove_page(Some(index as u32));
                        self.notebook.set_current_page(Some(active as u32));
                    });
                    let browser = self.browser.borrow();
                    self.labels
                        .borrow_mut()
                        .retain(|id, _| browser.tabs().get(*id).is_some());
                }
                ChromeUpdate::TabSelected { index } => {
                    self.sync(|| self.notebook.set_current_page(Some(index as u32)));
                }
                ChromeUpdate::Address(text) => {
                    self.sync(|| {
                        self.address_bar.set_text(&text);
                        self.address_bar.set_position(0);
                    });
                }
                ChromeUpdate::Label { index, label } => {
                    let tab_id = self.browser.borrow().tabs().at(index).map(|t| t.id());
                    let widget = tab_id.and_then(|id| self.labels.borrow().get(&id).cloned());
                    if let Some(widget) = widget {
                        widget.set_text(&label);
                    }
                }
                ChromeUpdate::HistoryAdded(url) => {
                    let entry = Label::new(Some(url.as_str()));
                    entry.set_halign(Align::Start);
                    entry.set_ellipsize(EllipsizeMode::End);
                    entry.set_tooltip_text(Some(url.as_str()));
                    self.history_list.append(&entry);
                }
                ChromeUpdate::HistoryCleared => {
                    while let Some(row) = self.history_list.first_child() {
                        self.history_list.remove(&row);
                    }
                }
                ChromeUpdate::Close => {
                    info!("Closing window");
                    self.window.close();
                }
            }
        }
    }

    fn add_page(self: &Rc<Self>, tab_id: TabId, index: usize) {
        let (webview, label_text, max_chars) = {
            let browser = self.browser.borrow();
            let Some(tab) = browser.tabs().get(tab_id) else {
                return;
            };
            (
                tab.view().widget().clone(),
                tab.label().to_string(),
                browser.config().label_max_chars,
            )
        };

        let header = GtkBox::new(Orientation::Horizontal, 4);
        let label = Label::new(Some(label_text.as_str()));
        label.set_halign(Align::Start);
        label.set_ellipsize(EllipsizeMode::End);
        label.set_max_width_chars(max_chars as i32 + 1);

        let close_btn = Button::from_icon_name("window-close-symbolic");
        close_btn.set_has_frame(false);
        close_btn.add_css_class("tab-close");
        {
            let c = self.clone();
            close_btn.connect_clicked(move |_| c.close_tab(tab_id));
        }

        header.append(&label);
        header.append(&close_btn);
        self.labels.borrow_mut().insert(tab_id, label);

        self.sync(|| {
            self.notebook.insert_page(&webview, Some(&header), Some(index as u32));
            self.notebook.set_current_page(Some(index as u32));
        });
    }

    /// Change widgets without feeding their signals back.
    fn sync(&self, f: impl FnOnce()) {
        let was = self.syncing.replace(true);
        f();
        self.syncing.set(was);
    }
}
