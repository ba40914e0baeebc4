pub mod client;
pub mod error;
pub mod page;
pub mod session;

pub use client::BrowserlessClient;
pub use error::BrowserError;
pub use page::{extract_text, extract_video_links};
pub use session::{BrowserSession, SessionOptions};
