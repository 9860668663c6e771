//! Mega Browser UI
//!
//! GTK4 frontend for the browser shell:
//! - view: WebKitGTK web views behind the shell's view contract
//! - webview: window, tab strip, toolbar and signal wiring

mod view;
mod webview;

pub use view::{GtkView, GtkViewFactory};
pub use webview::run_webview;
