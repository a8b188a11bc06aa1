//! Scriptable in-memory browser backend for exercising the session, wait,
//! and runner layers without a real Chrome process.

use crate::core::config::BrowserConfig;
use crate::core::{BrowserControl, ElementRef, Locator};
use crate::errors::{Result, ScoutError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// One protocol call as the mock backend saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Launch,
    Navigate(String),
    FindVisible(String),
    SendKeys { selector: String, text: String },
    Click(String),
    Screenshot,
    Close,
}

/// Shared view of the mock's call log. Clone it out of the backend before
/// handing the backend to a session; assertions run against the clone.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl CallLog {
    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn snapshot(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn screenshots(&self) -> usize {
        self.snapshot()
            .iter()
            .filter(|call| matches!(call, MockCall::Screenshot))
            .count()
    }

    pub fn closes(&self) -> usize {
        self.snapshot()
            .iter()
            .filter(|call| matches!(call, MockCall::Close))
            .count()
    }

    /// True when every screenshot attempt happened before the first close.
    pub fn screenshot_before_close(&self) -> bool {
        let calls = self.snapshot();
        let first_close = calls.iter().position(|c| matches!(c, MockCall::Close));
        let last_screenshot = calls.iter().rposition(|c| matches!(c, MockCall::Screenshot));
        match (last_screenshot, first_close) {
            (Some(shot), Some(close)) => shot < close,
            _ => false,
        }
    }
}

/// In-memory `BrowserControl` with per-operation failure injection and a
/// dial for how many probes an element stays invisible.
pub struct MockBrowser {
    log: CallLog,
    running: Arc<AtomicBool>,
    probes: Mutex<u32>,
    visible_after: Option<u32>,
    fail_launch: Option<String>,
    fail_navigate: Option<String>,
    fail_probe: Option<String>,
    fail_screenshot: Option<String>,
    fail_close: Option<String>,
}

impl Default for MockBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBrowser {
    pub fn new() -> Self {
        Self {
            log: CallLog::default(),
            running: Arc::new(AtomicBool::new(false)),
            probes: Mutex::new(0),
            visible_after: Some(0),
            fail_launch: None,
            fail_navigate: None,
            fail_probe: None,
            fail_screenshot: None,
            fail_close: None,
        }
    }

    pub fn log_handle(&self) -> CallLog {
        self.log.clone()
    }

    /// Shared view of the running state. Store `false` through it to
    /// simulate the browser process dying mid-session.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Element becomes visible on probe number `n` (zero-based).
    pub fn visible_after(mut self, n: u32) -> Self {
        self.visible_after = Some(n);
        self
    }

    pub fn never_visible(mut self) -> Self {
        self.visible_after = None;
        self
    }

    pub fn fail_launch(mut self, message: &str) -> Self {
        self.fail_launch = Some(message.to_string());
        self
    }

    pub fn fail_navigate(mut self, message: &str) -> Self {
        self.fail_navigate = Some(message.to_string());
        self
    }

    pub fn fail_probe(mut self, message: &str) -> Self {
        self.fail_probe = Some(message.to_string());
        self
    }

    pub fn fail_screenshot(mut self, message: &str) -> Self {
        self.fail_screenshot = Some(message.to_string());
        self
    }

    pub fn fail_close(mut self, message: &str) -> Self {
        self.fail_close = Some(message.to_string());
        self
    }
}

#[async_trait]
impl BrowserControl for MockBrowser {
    async fn launch(&mut self, _config: &BrowserConfig) -> Result<()> {
        self.log.record(MockCall::Launch);
        if let Some(message) = &self.fail_launch {
            return Err(ScoutError::LaunchFailed(message.clone()));
        }
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        self.log.record(MockCall::Navigate(url.to_string()));
        if let Some(message) = &self.fail_navigate {
            return Err(ScoutError::NavigationFailed(message.clone()));
        }
        Ok(())
    }

    async fn find_visible(&self, locator: &Locator) -> Result<Option<ElementRef>> {
        self.log
            .record(MockCall::FindVisible(locator.selector.clone()));
        if let Some(message) = &self.fail_probe {
            return Err(ScoutError::Session(message.clone()));
        }

        let seen = {
            let mut probes = self.probes.lock().unwrap();
            let seen = *probes;
            *probes += 1;
            seen
        };

        match self.visible_after {
            Some(n) if seen >= n => Ok(Some(ElementRef::new(locator.clone()))),
            _ => Ok(None),
        }
    }

    async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()> {
        self.log.record(MockCall::SendKeys {
            selector: element.locator().selector.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn click(&self, element: &ElementRef) -> Result<()> {
        self.log
            .record(MockCall::Click(element.locator().selector.clone()));
        Ok(())
    }

    async fn capture_screenshot(&self) -> Result<Vec<u8>> {
        self.log.record(MockCall::Screenshot);
        if let Some(message) = &self.fail_screenshot {
            return Err(ScoutError::ScreenshotFailed(message.clone()));
        }
        // PNG magic followed by a stub payload.
        Ok(vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00])
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn close(&mut self) -> Result<()> {
        self.log.record(MockCall::Close);
        self.running.store(false, Ordering::SeqCst);
        if let Some(message) = &self.fail_close {
            return Err(ScoutError::Session(message.clone()));
        }
        Ok(())
    }
}
