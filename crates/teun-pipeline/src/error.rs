use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("either a URL or a keyword is required")]
    MissingInput,

    #[error("LLM stage failed: {0}")]
    Llm(#[from] teun_llm::LlmError),

    #[error("scanner setup failed: {0}")]
    Scan(#[from] teun_scanner::ScanError),

    #[error("page fetcher setup failed: {0}")]
    Scraper(#[from] teun_scraper::ScraperError),
}
