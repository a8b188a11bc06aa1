use crate::browser::Session;
use crate::core::BrowserControl;
use crate::errors::Result;
use chrono::NaiveDateTime;
use std::path::PathBuf;
use tracing::info;

/// Writes the per-run screenshot artifact into the output directory as
/// `{script_id}_screenshot_{YYYYMMDD_HHMMSS}.png`.
pub struct ScreenshotWriter {
    output_dir: PathBuf,
    script_id: String,
}

impl ScreenshotWriter {
    pub fn new(output_dir: impl Into<PathBuf>, script_id: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            script_id: script_id.into(),
        }
    }

    pub fn script_id(&self) -> &str {
        &self.script_id
    }

    fn file_name_at(&self, timestamp: NaiveDateTime) -> String {
        format!(
            "{}_screenshot_{}.png",
            self.script_id,
            timestamp.format("%Y%m%d_%H%M%S")
        )
    }

    fn next_path(&self) -> PathBuf {
        self.output_dir
            .join(self.file_name_at(chrono::Local::now().naive_local()))
    }

    /// Capture the session's current render and write it out, returning the
    /// artifact path.
    pub async fn capture<B: BrowserControl>(&self, session: &Session<B>) -> Result<PathBuf> {
        let path = self.next_path();
        session.screenshot_to(&path).await?;
        info!("Screenshot saved as {}", path.display());
        Ok(path)
    }
}
