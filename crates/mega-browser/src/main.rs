//! Mega Browser: minimal tabbed browser shell
//!
//! Main entry point. Initializes the global allocator, sets up logging,
//! and launches the GTK window with WebKit tabs.

use anyhow::Result;
use mega_shell::BrowserConfig;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

// Use mimalloc as the global allocator for reduced memory fragmentation
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    let config = BrowserConfig::default();
    info!("Mega Browser starting, home page {}", config.home_url);

    mega_ui::run_webview(config)?;

    info!("Mega Browser shutting down");
    Ok(())
}
