use crate::browser::{ChromeBrowser, ElementWait, Session};
use crate::core::{BrowserControl, Locator, ScoutConfig};
use crate::errors::{Result, ScoutError};
use crate::utils::{Pacing, ScreenshotWriter};
use std::path::PathBuf;
use tracing::{info, warn};

const SEARCH_URL: &str = "https://duckduckgo.com/";
const SEARCH_INPUT: &str = "//input[@id='searchbox_input']";
const SEARCH_SUBMIT: &str = "//button[@aria-label='Search']";

/// Runs one top-level scripted action against one session. The runner owns
/// the session and every action consumes the runner, so "screenshot then
/// terminate, exactly once, on every exit path" is structural: there is no
/// way to return to the caller without passing through `finish`, and no
/// runner left afterwards to act through.
pub struct ScriptRunner<B: BrowserControl> {
    session: Session<B>,
    screenshots: ScreenshotWriter,
    wait: ElementWait,
    pacing: Pacing,
}

impl ScriptRunner<ChromeBrowser> {
    /// Launch a Chrome-backed runner in one step.
    pub async fn launch_chrome(
        config: &ScoutConfig,
        output_dir: impl Into<PathBuf>,
        script_id: impl Into<String>,
    ) -> Result<Self> {
        let session = Session::new(ChromeBrowser::new(), &config.browser).await?;
        Ok(
            Self::new(session, ScreenshotWriter::new(output_dir, script_id))
                .with_pacing(Pacing::from_config(&config.pacing)),
        )
    }
}

impl<B: BrowserControl> ScriptRunner<B> {
    pub fn new(session: Session<B>, screenshots: ScreenshotWriter) -> Self {
        Self {
            session,
            screenshots,
            wait: ElementWait::default(),
            pacing: Pacing::default(),
        }
    }

    pub fn with_wait(mut self, wait: ElementWait) -> Self {
        self.wait = wait;
        self
    }

    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Search DuckDuckGo for `term`: navigate, type the query, submit.
    pub async fn search(self, term: &str) -> Result<()> {
        info!(
            "Running search for '{}' as {}",
            term,
            self.screenshots.script_id()
        );
        let outcome = self.search_steps(term).await;
        self.finish(outcome).await
    }

    async fn search_steps(&self, term: &str) -> Result<()> {
        self.session.navigate(SEARCH_URL).await?;
        self.pacing.pause().await;

        self.wait
            .send_text(&self.session, &Locator::xpath(SEARCH_INPUT), term)
            .await?;
        self.pacing.pause().await;

        let submit = self
            .wait
            .locate(&self.session, &Locator::xpath(SEARCH_SUBMIT))
            .await?
            .require()?;
        self.session.click(&submit).await?;
        self.pacing.pause().await;

        Ok(())
    }

    /// Navigate to an arbitrary URL, capturing evidence of the attempt even
    /// when the host is unreachable.
    pub async fn visit(self, url: &str) -> Result<()> {
        info!(
            "Running visit to {} as {}",
            url,
            self.screenshots.script_id()
        );
        let outcome = self.visit_steps(url).await;
        self.finish(outcome).await
    }

    async fn visit_steps(&self, url: &str) -> Result<()> {
        url::Url::parse(url)
            .map_err(|e| ScoutError::NavigationFailed(format!("invalid URL '{}': {}", url, e)))?;
        self.session.navigate(url).await
    }

    /// Guaranteed finalization: attempt the screenshot, then terminate, in
    /// that order, regardless of how the action body went. A body failure
    /// outranks finalization failures (those are logged, not surfaced); when
    /// the body succeeded and both finalization steps failed, the composite
    /// error carries both causes.
    async fn finish(mut self, outcome: Result<()>) -> Result<()> {
        let screenshot = self.screenshots.capture(&self.session).await;
        let close = self.session.terminate().await;

        match outcome {
            Err(body) => {
                if let Err(e) = &screenshot {
                    warn!("Screenshot capture failed during cleanup: {}", e);
                }
                if let Err(e) = &close {
                    warn!("Session close failed during cleanup: {}", e);
                }
                Err(body)
            }
            Ok(()) => match (screenshot, close) {
                (Ok(_), Ok(())) => Ok(()),
                (Err(shot), Ok(())) => Err(shot),
                (Ok(path), Err(close)) => {
                    warn!(
                        "Evidence written to {} but session close failed",
                        path.display()
                    );
                    Err(close)
                }
                (Err(shot), Err(close)) => Err(ScoutError::CleanupFailed {
                    screenshot: Box::new(shot),
                    close: Box::new(close),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::BrowserConfig;
    use crate::testing::{CallLog, MockBrowser, MockCall};
    use std::path::Path;
    use std::time::Duration;

    async fn temp_output_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("scout-runner-{}-{}", tag, uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        dir
    }

    async fn runner(mock: MockBrowser, output_dir: &Path) -> ScriptRunner<MockBrowser> {
        let session = Session::new(mock, &BrowserConfig::default()).await.unwrap();
        ScriptRunner::new(session, ScreenshotWriter::new(output_dir, "runner_test"))
            // Zero pacing keeps virtual-time tests deterministic.
            .with_pacing(Pacing::new(Duration::ZERO, Duration::ZERO))
    }

    fn assert_finalized_once(log: &CallLog) {
        assert_eq!(log.screenshots(), 1, "expected exactly one screenshot");
        assert_eq!(log.closes(), 1, "expected exactly one close");
        assert!(
            log.screenshot_before_close(),
            "screenshot must precede termination"
        );
    }

    async fn artifact_count(dir: &Path) -> usize {
        let mut entries = tokio::fs::read_dir(dir).await.unwrap();
        let mut count = 0;
        while entries.next_entry().await.unwrap().is_some() {
            count += 1;
        }
        count
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_search_finalizes_once() {
        let dir = temp_output_dir("success").await;
        let mock = MockBrowser::new().visible_after(0);
        let log = mock.log_handle();

        runner(mock, &dir).await.search("rust async").await.unwrap();

        assert_finalized_once(&log);
        assert_eq!(artifact_count(&dir).await, 1);

        let calls = log.snapshot();
        let typed = calls
            .iter()
            .any(|c| matches!(c, MockCall::SendKeys { text, .. } if text == "rust async"));
        let clicked = calls
            .iter()
            .any(|c| matches!(c, MockCall::Click(sel) if sel == SEARCH_SUBMIT));
        assert!(typed && clicked);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigation_failure_still_finalizes() {
        let dir = temp_output_dir("nav-fail").await;
        let mock = MockBrowser::new().fail_navigate("net::ERR_NAME_NOT_RESOLVED");
        let log = mock.log_handle();

        let result = runner(mock, &dir).await.search("unreachable").await;

        assert!(matches!(result, Err(ScoutError::NavigationFailed(_))));
        assert_finalized_once(&log);
        assert_eq!(artifact_count(&dir).await, 1);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_element_times_out_then_finalizes() {
        let dir = temp_output_dir("not-found").await;
        let mock = MockBrowser::new().never_visible();
        let log = mock.log_handle();

        let result = runner(mock, &dir).await.search("no input field").await;

        match result {
            Err(ScoutError::ElementNotFound { waited_ms, .. }) => {
                assert!(waited_ms >= 10_000);
            }
            other => panic!("expected ElementNotFound, got {:?}", other),
        }
        assert_finalized_once(&log);
        assert_eq!(artifact_count(&dir).await, 1);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_error_during_locate_still_finalizes() {
        let dir = temp_output_dir("probe-fail").await;
        let mock = MockBrowser::new().fail_probe("connection reset");
        let log = mock.log_handle();

        let result = runner(mock, &dir).await.search("doomed").await;

        assert!(matches!(result, Err(ScoutError::Session(_))));
        assert_finalized_once(&log);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_screenshot_failure_does_not_skip_termination() {
        let dir = temp_output_dir("shot-fail").await;
        let mock = MockBrowser::new()
            .visible_after(0)
            .fail_screenshot("render target gone");
        let log = mock.log_handle();

        let result = runner(mock, &dir).await.search("evidence lost").await;

        // Body succeeded, so the capture failure is what surfaces.
        assert!(matches!(result, Err(ScoutError::ScreenshotFailed(_))));
        assert_eq!(log.screenshots(), 1);
        assert_eq!(log.closes(), 1);
        assert_eq!(artifact_count(&dir).await, 0);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_finalization_failure_surfaces_both() {
        let dir = temp_output_dir("double-fail").await;
        let mock = MockBrowser::new()
            .visible_after(0)
            .fail_screenshot("render target gone")
            .fail_close("socket dropped");

        let result = runner(mock, &dir).await.search("twice unlucky").await;

        match result {
            Err(ScoutError::CleanupFailed { screenshot, close }) => {
                assert!(screenshot.to_string().contains("render target gone"));
                assert!(close.to_string().contains("socket dropped"));
            }
            other => panic!("expected CleanupFailed, got {:?}", other),
        }

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_body_failure_outranks_finalization_failures() {
        let dir = temp_output_dir("body-first").await;
        let mock = MockBrowser::new()
            .fail_navigate("net::ERR_CONNECTION_REFUSED")
            .fail_screenshot("render target gone")
            .fail_close("socket dropped");
        let log = mock.log_handle();

        let result = runner(mock, &dir).await.visit("https://example.invalid/").await;

        // The navigation failure is what the operator must act on.
        assert!(matches!(result, Err(ScoutError::NavigationFailed(_))));
        assert_eq!(log.screenshots(), 1);
        assert_eq!(log.closes(), 1);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_visit_rejects_invalid_urls_but_still_finalizes() {
        let dir = temp_output_dir("bad-url").await;
        let mock = MockBrowser::new();
        let log = mock.log_handle();

        let result = runner(mock, &dir).await.visit("not a url").await;

        assert!(matches!(result, Err(ScoutError::NavigationFailed(_))));
        // The bad URL never reached the backend.
        assert!(!log
            .snapshot()
            .iter()
            .any(|c| matches!(c, MockCall::Navigate(_))));
        assert_finalized_once(&log);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_visit_succeeds_without_element_lookups() {
        let dir = temp_output_dir("visit-ok").await;
        let mock = MockBrowser::new().never_visible();
        let log = mock.log_handle();

        runner(mock, &dir)
            .await
            .visit("https://example.com/")
            .await
            .unwrap();

        assert_finalized_once(&log);
        assert!(!log
            .snapshot()
            .iter()
            .any(|c| matches!(c, MockCall::FindVisible(_))));

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}
