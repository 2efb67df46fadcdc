use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("{url} served a placeholder page ({signal})")]
    GarbagePage { url: String, signal: String },

    #[error("response from {url} too short ({len} bytes)")]
    TooShort { url: String, len: usize },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("no rendering proxy configured")]
    ProxyUnavailable,

    #[error("every fetch attempt for {url} failed")]
    AllAttemptsFailed { url: String },
}
