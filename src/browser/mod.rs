pub mod extractor;
pub mod navigator;
pub mod session;
pub mod source;

mod errors;

pub use errors::ScrapeError;
pub use navigator::MATCH_LIST_READY_TIMEOUT;
pub use session::BrowserSession;
pub use source::{ChromeMatchSource, ChromeScrapeSession, MatchIdSource, ScrapeSession};
