use crate::browser::Session;
use crate::core::{BrowserControl, ElementRef, LocateOutcome, Locator};
use crate::errors::Result;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Default bound for a single locate, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Internal poll cadence. Not externally configurable.
const POLL_INTERVAL_MS: u64 = 50;

/// Bounded element lookup: polls the session for a visible match until found
/// or the timeout elapses. Absence within the bound is a `LocateOutcome`
/// value; only transport-level disruption comes back as an error, and that
/// stops the poll immediately rather than being retried.
#[derive(Debug, Clone)]
pub struct ElementWait {
    timeout: Duration,
}

impl Default for ElementWait {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ElementWait {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Poll for `locator` under the configured default timeout.
    pub async fn locate<B: BrowserControl>(
        &self,
        session: &Session<B>,
        locator: &Locator,
    ) -> Result<LocateOutcome> {
        self.locate_within(session, locator, self.timeout).await
    }

    /// Poll for `locator` under an explicit per-call timeout. Returns as soon
    /// as a match is visible; never waits out the remainder of the bound.
    pub async fn locate_within<B: BrowserControl>(
        &self,
        session: &Session<B>,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<LocateOutcome> {
        let start = Instant::now();
        let interval = Duration::from_millis(POLL_INTERVAL_MS);

        loop {
            if let Some(element) = session.find_visible(locator).await? {
                debug!("Located {} after {:?}", locator, start.elapsed());
                return Ok(LocateOutcome::Found(element));
            }

            let elapsed = start.elapsed();
            if elapsed >= timeout {
                debug!("Gave up on {} after {:?}", locator, elapsed);
                return Ok(LocateOutcome::NotFound {
                    locator: locator.clone(),
                    waited: elapsed,
                });
            }

            // Clamp the last sleep so NotFound lands at the deadline, not one
            // interval past it.
            tokio::time::sleep(interval.min(timeout - elapsed)).await;
        }
    }

    /// Absence-tolerant locate: NotFound becomes `None`, session errors still
    /// propagate.
    pub async fn locate_optional<B: BrowserControl>(
        &self,
        session: &Session<B>,
        locator: &Locator,
    ) -> Result<Option<ElementRef>> {
        Ok(self.locate(session, locator).await?.into_option())
    }

    /// Locate an element and type `text` into it. Absence here is an error:
    /// typing requires the element.
    pub async fn send_text<B: BrowserControl>(
        &self,
        session: &Session<B>,
        locator: &Locator,
        text: &str,
    ) -> Result<()> {
        let element = self.locate(session, locator).await?.require()?;
        session.send_keys(&element, text).await
    }
}
