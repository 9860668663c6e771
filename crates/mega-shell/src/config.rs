//! Startup configuration.

/// Page opened in the first tab and in every new tab
pub const DEFAULT_HOME_URL: &str = "https://www.kadaza.com/";

/// Configuration for the main window.
///
/// Built once at startup and handed to [`MainWindow::new`](crate::MainWindow::new).
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// URL loaded by new tabs
    pub home_url: String,
    /// Label shown for a tab until its page reports a title
    pub new_tab_label: String,
    /// Window title
    pub window_title: String,
    /// Initial window width
    pub width: i32,
    /// Initial window height
    pub height: i32,
    /// Page titles longer than this are shortened in the tab strip
    pub label_max_chars: usize,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            home_url: DEFAULT_HOME_URL.to_string(),
            new_tab_label: String::from("New Tab"),
            window_title: String::from("Mega Browser"),
            width: 1000,
            height: 700,
            label_max_chars: 20,
        }
    }
}
