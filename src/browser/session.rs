use crate::core::config::BrowserConfig;
use crate::core::{BrowserControl, ElementRef, Locator};
use crate::errors::{Result, ScoutError};
use std::path::Path;
use tracing::{debug, info};

/// One live remote browser instance, owned exclusively by the runner that
/// created it. The browser is launched inside the constructor, so a `Session`
/// that exists is a session that started; if launch fails no session exists
/// and nothing is owed cleanup.
pub struct Session<B: BrowserControl> {
    browser: B,
    session_id: String,
    live: bool,
}

impl<B: BrowserControl> Session<B> {
    pub async fn new(mut browser: B, config: &BrowserConfig) -> Result<Self> {
        browser.launch(config).await?;
        let session_id = uuid::Uuid::new_v4().to_string();
        info!(
            "Browser session {} started ({}x{})",
            session_id, config.viewport.width, config.viewport.height
        );

        Ok(Self {
            browser,
            session_id,
            live: true,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    fn ensure_live(&self) -> Result<()> {
        if !self.live {
            return Err(ScoutError::SessionClosed);
        }
        // The flag says we never terminated, but the process can still die
        // underneath us.
        if !self.browser.is_running() {
            return Err(ScoutError::Session(
                "browser process is no longer running".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn navigate(&self, url: &str) -> Result<()> {
        self.ensure_live()?;
        info!("Navigating to {}", url);
        self.browser.navigate(url).await
    }

    /// Probe once for a visible element. Absence is `None`, not an error;
    /// the bounded wait layer turns repeated absence into a NotFound outcome.
    pub async fn find_visible(&self, locator: &Locator) -> Result<Option<ElementRef>> {
        self.ensure_live()?;
        self.browser.find_visible(locator).await
    }

    pub async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()> {
        self.ensure_live()?;
        self.browser.send_keys(element, text).await
    }

    pub async fn click(&self, element: &ElementRef) -> Result<()> {
        self.ensure_live()?;
        self.browser.click(element).await
    }

    /// Capture whatever is currently rendered and write it to `path` as PNG.
    /// Callable mid-load or after a failed action; it records the page as-is.
    pub async fn screenshot_to(&self, path: &Path) -> Result<()> {
        self.ensure_live()?;
        let bytes = self.browser.capture_screenshot().await?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    /// Shut the browser down. Safe to call more than once; only the first
    /// call reaches the backend, later calls are no-ops.
    pub async fn terminate(&mut self) -> Result<()> {
        if !self.live {
            debug!("Session {} already terminated", self.session_id);
            return Ok(());
        }
        self.live = false;
        info!("Terminating browser session {}", self.session_id);
        self.browser.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockBrowser, MockCall};

    fn config() -> BrowserConfig {
        BrowserConfig::default()
    }

    #[tokio::test]
    async fn test_launch_failure_yields_no_session() {
        let mock = MockBrowser::new().fail_launch("chrome binary missing");
        let log = mock.log_handle();

        match Session::new(mock, &config()).await {
            Err(ScoutError::LaunchFailed(message)) => {
                assert!(message.contains("chrome binary missing"));
            }
            other => panic!("expected LaunchFailed, got {:?}", other.map(|_| ())),
        }

        // Only the launch attempt reached the backend.
        assert_eq!(log.snapshot(), vec![MockCall::Launch]);
        assert_eq!(log.screenshots(), 0);
        assert_eq!(log.closes(), 0);
    }

    #[tokio::test]
    async fn test_terminate_is_idempotent() {
        let mock = MockBrowser::new();
        let log = mock.log_handle();
        let mut session = Session::new(mock, &config()).await.unwrap();

        session.terminate().await.unwrap();
        session.terminate().await.unwrap();
        session.terminate().await.unwrap();

        assert_eq!(log.closes(), 1);
        assert!(!session.is_live());
    }

    #[tokio::test]
    async fn test_no_actions_after_termination() {
        let mock = MockBrowser::new().visible_after(0);
        let mut session = Session::new(mock, &config()).await.unwrap();
        let element = session
            .find_visible(&Locator::css("#input"))
            .await
            .unwrap()
            .unwrap();

        session.terminate().await.unwrap();

        assert!(matches!(
            session.navigate("https://example.com").await,
            Err(ScoutError::SessionClosed)
        ));
        assert!(matches!(
            session.find_visible(&Locator::css("#input")).await,
            Err(ScoutError::SessionClosed)
        ));
        // A retained element reference is no better than a fresh lookup.
        assert!(matches!(
            session.send_keys(&element, "stale").await,
            Err(ScoutError::SessionClosed)
        ));
        assert!(matches!(
            session.click(&element).await,
            Err(ScoutError::SessionClosed)
        ));
    }

    #[tokio::test]
    async fn test_dead_browser_process_surfaces_as_session_error() {
        let mock = MockBrowser::new().visible_after(0);
        let running = mock.running_flag();
        let mut session = Session::new(mock, &config()).await.unwrap();

        session.navigate("https://example.com").await.unwrap();

        // The process dies underneath a session that was never terminated.
        running.store(false, std::sync::atomic::Ordering::SeqCst);

        assert!(session.is_live());
        assert!(matches!(
            session.navigate("https://example.com").await,
            Err(ScoutError::Session(_))
        ));
        assert!(matches!(
            session.find_visible(&Locator::css("#input")).await,
            Err(ScoutError::Session(_))
        ));

        // Termination still goes through and is still the only close.
        session.terminate().await.unwrap();
        assert!(!session.is_live());
    }

    #[tokio::test]
    async fn test_terminate_stays_closed_even_if_backend_close_fails() {
        let mock = MockBrowser::new().fail_close("socket dropped");
        let mut session = Session::new(mock, &config()).await.unwrap();

        assert!(session.terminate().await.is_err());
        assert!(!session.is_live());
        // The failed close was still the only close; retry is a no-op.
        session.terminate().await.unwrap();
    }

    #[tokio::test]
    async fn test_screenshot_to_writes_png_bytes() {
        let mock = MockBrowser::new();
        let session = Session::new(mock, &config()).await.unwrap();

        let dir = std::env::temp_dir().join(format!("scout-session-{}", session.session_id()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("evidence.png");

        session.screenshot_to(&path).await.unwrap();

        let bytes = tokio::fs::read(&path).await.unwrap();
        assert!(!bytes.is_empty());
        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
