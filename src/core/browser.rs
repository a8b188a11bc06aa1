use crate::core::config::BrowserConfig;
use crate::core::element::{ElementRef, Locator};
use crate::errors::Result;
use async_trait::async_trait;

/// Remote browser control capability. Any backend that implements these
/// operations can drive a scripted session.
#[async_trait]
pub trait BrowserControl: Send + Sync {
    /// Launch the browser process with the configured viewport
    async fn launch(&mut self, config: &BrowserConfig) -> Result<()>;

    /// Load a URL and wait for the navigation to settle
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Probe once for a visible element matching the locator
    async fn find_visible(&self, locator: &Locator) -> Result<Option<ElementRef>>;

    /// Type text into a previously located element
    async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()>;

    /// Click a previously located element
    async fn click(&self, element: &ElementRef) -> Result<()>;

    /// Capture the current render as PNG bytes
    async fn capture_screenshot(&self) -> Result<Vec<u8>>;

    /// Check if the browser is still running
    fn is_running(&self) -> bool;

    /// Shut the browser down and release its resources
    async fn close(&mut self) -> Result<()>;
}
