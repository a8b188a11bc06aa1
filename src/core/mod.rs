pub mod browser;
pub mod config;
pub mod element;

pub use browser::BrowserControl;
pub use config::{BrowserConfig, PacingConfig, ScoutConfig, Viewport, OUTPUT_DIR_ENV};
pub use element::{ElementRef, LocateOutcome, Locator, Strategy};
