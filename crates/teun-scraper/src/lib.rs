pub mod client;
pub mod error;
pub mod extract;
pub mod garbage;
pub mod parse;

pub use client::{FetchedPage, FetcherConfig, PageFetcher};
pub use error::ScraperError;
pub use extract::{extract_context, Extraction, ExtractionMethod};
pub use garbage::{garbage_signal, is_garbage_page};
pub use parse::parse_page;
