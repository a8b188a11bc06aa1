pub mod pacing;
pub mod screenshot;

pub use pacing::Pacing;
pub use screenshot::ScreenshotWriter;
