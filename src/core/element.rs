use crate::errors::{Result, ScoutError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// How a locator's selector string is interpreted by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    Css,
    XPath,
}

impl Strategy {
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Css => "css",
            Strategy::XPath => "xpath",
        }
    }
}

/// Identifies one UI element as a (strategy, selector) pair. Pure value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locator {
    pub strategy: Strategy,
    pub selector: String,
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Css,
            selector: selector.into(),
        }
    }

    pub fn xpath(selector: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::XPath,
            selector: selector.into(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.strategy.name(), self.selector)
    }
}

/// Handle to an element a backend reported visible. Valid only while the
/// owning session is live; backends re-resolve it through its locator.
#[derive(Debug, Clone)]
pub struct ElementRef {
    locator: Locator,
}

impl ElementRef {
    pub fn new(locator: Locator) -> Self {
        Self { locator }
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }
}

/// Outcome of a bounded locate. Absence within the timeout is a value here,
/// not an error; `require` is where a mandatory lookup turns it into one.
#[derive(Debug)]
pub enum LocateOutcome {
    Found(ElementRef),
    NotFound { locator: Locator, waited: Duration },
}

impl LocateOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, LocateOutcome::Found(_))
    }

    pub fn into_option(self) -> Option<ElementRef> {
        match self {
            LocateOutcome::Found(element) => Some(element),
            LocateOutcome::NotFound { .. } => None,
        }
    }

    pub fn require(self) -> Result<ElementRef> {
        match self {
            LocateOutcome::Found(element) => Ok(element),
            LocateOutcome::NotFound { locator, waited } => Err(ScoutError::ElementNotFound {
                locator: locator.to_string(),
                waited_ms: waited.as_millis() as u64,
            }),
        }
    }
}
