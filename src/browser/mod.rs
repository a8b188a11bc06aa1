pub mod chrome;
pub mod session;
pub mod wait;

pub use chrome::ChromeBrowser;
pub use session::Session;
pub use wait::{ElementWait, DEFAULT_TIMEOUT_MS};
