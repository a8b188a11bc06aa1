use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("Browser not launched")]
    NotLaunched,

    #[error("Session already terminated")]
    SessionClosed,

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Browser session error: {0}")]
    Session(String),

    #[error("Element not found: {locator} (waited {waited_ms}ms)")]
    ElementNotFound { locator: String, waited_ms: u64 },

    #[error("Screenshot capture failed: {0}")]
    ScreenshotFailed(String),

    #[error("Cleanup failed: screenshot: {screenshot}; session close: {close}")]
    CleanupFailed {
        screenshot: Box<ScoutError>,
        close: Box<ScoutError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, ScoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_not_found_reports_locator_and_wait() {
        let err = ScoutError::ElementNotFound {
            locator: "xpath //button[@aria-label='Search']".to_string(),
            waited_ms: 10000,
        };
        let message = err.to_string();
        assert!(message.contains("//button[@aria-label='Search']"));
        assert!(message.contains("10000ms"));
    }

    #[test]
    fn test_cleanup_failed_reports_both_causes() {
        let err = ScoutError::CleanupFailed {
            screenshot: Box::new(ScoutError::ScreenshotFailed("render gone".to_string())),
            close: Box::new(ScoutError::Session("socket dropped".to_string())),
        };
        let message = err.to_string();
        assert!(message.contains("render gone"));
        assert!(message.contains("socket dropped"));
    }
}
