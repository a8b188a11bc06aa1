pub mod actions;
pub mod browser;
pub mod core;
pub mod errors;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use actions::ScriptRunner;
pub use browser::{ChromeBrowser, ElementWait, Session};
pub use crate::core::{
    BrowserConfig, BrowserControl, ElementRef, LocateOutcome, Locator, PacingConfig, ScoutConfig,
    Strategy, Viewport,
};
pub use errors::{Result, ScoutError};
pub use utils::{Pacing, ScreenshotWriter};
