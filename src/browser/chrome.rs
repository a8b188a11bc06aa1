use crate::core::config::BrowserConfig;
use crate::core::{BrowserControl, ElementRef, Locator, Strategy};
use crate::errors::{Result, ScoutError};
use async_trait::async_trait;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::sync::Arc;
use tracing::debug;

const VISIBILITY_CHECK: &str = r#"
function() {
    return this.offsetWidth > 0
        && this.offsetHeight > 0
        && this.getClientRects().length > 0;
}
"#;

/// Chrome over the DevTools protocol. One browser, one tab; element
/// references are re-resolved through their locator on every action, since
/// DevTools element handles borrow the tab.
pub struct ChromeBrowser {
    browser: Option<Browser>,
    tab: Option<Arc<Tab>>,
}

impl ChromeBrowser {
    pub fn new() -> Self {
        Self {
            browser: None,
            tab: None,
        }
    }

    fn tab(&self) -> Result<&Arc<Tab>> {
        self.tab.as_ref().ok_or(ScoutError::NotLaunched)
    }

    fn resolve<'a>(&self, tab: &'a Arc<Tab>, locator: &Locator) -> Result<Element<'a>> {
        let found = match locator.strategy {
            Strategy::Css => tab.find_element(&locator.selector),
            Strategy::XPath => tab.find_element_by_xpath(&locator.selector),
        };
        found.map_err(|e| ScoutError::Session(format!("{}: {}", locator, e)))
    }

    fn is_visible(element: &Element<'_>) -> Result<bool> {
        let remote = element
            .call_js_fn(VISIBILITY_CHECK, vec![], false)
            .map_err(|e| ScoutError::Session(format!("visibility check failed: {}", e)))?;
        Ok(remote.value.map(|v| v == serde_json::Value::Bool(true)).unwrap_or(false))
    }
}

impl Default for ChromeBrowser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowserControl for ChromeBrowser {
    async fn launch(&mut self, config: &BrowserConfig) -> Result<()> {
        let window_size_arg = format!(
            "--window-size={},{}",
            config.viewport.width, config.viewport.height
        );

        let mut args = vec![
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new(&window_size_arg),
        ];

        for arg in &config.args {
            args.push(OsStr::new(arg));
        }

        let launch_options = LaunchOptions::default_builder()
            .headless(config.headless)
            .window_size(Some((config.viewport.width, config.viewport.height)))
            .args(args)
            .build()
            .map_err(|e| ScoutError::LaunchFailed(e.to_string()))?;

        let browser =
            Browser::new(launch_options).map_err(|e| ScoutError::LaunchFailed(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| ScoutError::LaunchFailed(e.to_string()))?;

        self.browser = Some(browser);
        self.tab = Some(tab);
        Ok(())
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        let tab = self.tab()?;

        tab.navigate_to(url)
            .map_err(|e| ScoutError::NavigationFailed(e.to_string()))?;

        tab.wait_until_navigated()
            .map_err(|e| ScoutError::NavigationFailed(e.to_string()))?;

        Ok(())
    }

    async fn find_visible(&self, locator: &Locator) -> Result<Option<ElementRef>> {
        let tab = self.tab()?;

        // DevTools reports "no such element" as an opaque error. Before
        // treating a failed find as absent-this-tick, confirm the transport
        // itself still answers; a dead connection must stop the poll.
        let element = match self.resolve(tab, locator) {
            Ok(element) => element,
            Err(e) => {
                if tab.evaluate("true", false).is_err() {
                    return Err(ScoutError::Session(format!(
                        "browser connection lost while probing {}: {}",
                        locator, e
                    )));
                }
                debug!("Probe for {} came back empty: {}", locator, e);
                return Ok(None);
            }
        };

        if Self::is_visible(&element)? {
            Ok(Some(ElementRef::new(locator.clone())))
        } else {
            Ok(None)
        }
    }

    async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()> {
        let tab = self.tab()?;
        let resolved = self.resolve(tab, element.locator())?;

        resolved
            .type_into(text)
            .map_err(|e| ScoutError::Session(format!("typing failed: {}", e)))?;

        Ok(())
    }

    async fn click(&self, element: &ElementRef) -> Result<()> {
        let tab = self.tab()?;
        let resolved = self.resolve(tab, element.locator())?;

        resolved
            .click()
            .map_err(|e| ScoutError::Session(format!("click failed: {}", e)))?;

        Ok(())
    }

    async fn capture_screenshot(&self) -> Result<Vec<u8>> {
        let tab = self.tab()?;

        let screenshot = tab
            .capture_screenshot(
                headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption::Png,
                None,
                None,
                true,
            )
            .map_err(|e| ScoutError::ScreenshotFailed(e.to_string()))?;

        Ok(screenshot)
    }

    fn is_running(&self) -> bool {
        self.browser.is_some()
    }

    async fn close(&mut self) -> Result<()> {
        // Dropping the handle kills the spawned process.
        self.tab = None;
        self.browser = None;
        Ok(())
    }
}
