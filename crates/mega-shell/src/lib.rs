//! Mega Browser Shell
//!
//! Toolkit-independent browser chrome logic:
//! - config: startup configuration passed into the main window
//! - address: address bar text, cursor and URL normalization
//! - history: URLs visited during this session
//! - toolbar: navigation actions forwarded to the active tab
//! - window: the main window state machine tying it all together

mod address;
mod config;
mod history;
mod toolbar;
mod window;

pub use address::{normalize_url, AddressBar, DEFAULT_SCHEME};
pub use config::BrowserConfig;
pub use history::History;
pub use toolbar::NavAction;
pub use window::{ChromeUpdate, MainWindow, WindowState};
