mod download;
mod locator;
mod webdriver;

pub use locator::Locator;
pub use webdriver::WebDriverLauncher;

use crate::config::{BrowserKind, Config};
use crate::error::BrowserError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowHandle(pub String);

#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub headless: bool,
    pub viewport: (u32, u32),
    pub user_agent: String,
    /// Pause after every action
    pub slow_mo: Duration,
    pub page_load_timeout: Duration,
}

impl LaunchOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            headless: config.headless,
            viewport: (config.browser.viewport_width, config.browser.viewport_height),
            user_agent: config.browser.user_agent.clone(),
            slow_mo: if config.headless {
                Duration::ZERO
            } else {
                Duration::from_millis(config.browser.slow_mo_ms)
            },
            page_load_timeout: Duration::from_millis(config.timeouts.page_load_ms),
        }
    }
}

/// Starts browser sessions
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self, options: &LaunchOptions)
        -> Result<Box<dyn BrowserSession>, BrowserError>;
}

/// One exclusive browser session.
///
/// Element actions wait up to `timeout` for the element to appear and
/// accept the action. `close` must be called on every exit path.
#[async_trait]
pub trait BrowserSession: Send {
    async fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    async fn reload(&mut self) -> Result<(), BrowserError>;

    /// Wait for a window that was not open when the session started
    async fn wait_for_popup(&mut self, timeout: Duration) -> Result<WindowHandle, BrowserError>;

    async fn switch_to(&mut self, window: &WindowHandle) -> Result<(), BrowserError>;

    async fn switch_to_main(&mut self) -> Result<(), BrowserError>;

    async fn wait_for_close(
        &mut self,
        window: &WindowHandle,
        timeout: Duration,
    ) -> Result<(), BrowserError>;

    async fn wait_for(&mut self, locator: &Locator, timeout: Duration) -> Result<(), BrowserError>;

    async fn fill(
        &mut self,
        locator: &Locator,
        text: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError>;

    async fn press_enter(&mut self, locator: &Locator, timeout: Duration)
        -> Result<(), BrowserError>;

    async fn click(&mut self, locator: &Locator, timeout: Duration) -> Result<(), BrowserError>;

    /// Write an input's value directly (works on read-only inputs) and
    /// fire `input` and `change` events
    async fn set_value(
        &mut self,
        locator: &Locator,
        value: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError>;

    /// Wait for a download to finish and return where the browser put it
    async fn wait_for_download(&mut self, timeout: Duration) -> Result<PathBuf, BrowserError>;

    async fn screenshot(&mut self, path: &Path) -> Result<(), BrowserError>;

    async fn close(&mut self) -> Result<(), BrowserError>;
}

/// Kill leftover browser processes so a visible launch starts clean.
/// Only acts on Windows; failures are ignored.
pub fn kill_stale_browser(kind: BrowserKind) {
    if !cfg!(target_os = "windows") {
        debug!("Skipping stale {} cleanup on this platform", kind);
        return;
    }

    let image = match kind {
        BrowserKind::Edge => "msedge.exe",
        BrowserKind::Chrome => "chrome.exe",
    };
    debug!("Killing stale {} processes", image);
    let _ = std::process::Command::new("taskkill")
        .args(["/F", "/IM", image, "/T"])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status();
}
