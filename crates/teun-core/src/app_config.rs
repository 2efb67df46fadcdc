use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Reverse proxies whose `x-forwarded-for` header is believed.
    pub trusted_proxies: Vec<IpAddr>,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,

    pub anthropic_api_key: String,
    pub llm_model: String,
    pub llm_base_url: String,
    pub llm_timeout_secs: u64,
    pub llm_max_retries: u32,

    pub perplexity_api_key: Option<String>,
    pub serpapi_key: Option<String>,
    pub scraper_api_key: Option<String>,

    pub fetch_timeout_secs: u64,
    pub proxy_timeout_secs: u64,
    pub engine_timeout_secs: u64,
    pub fetch_user_agent: String,

    pub scan_max_prompts: usize,
    pub scan_batch_size: usize,
    pub scan_batch_delay_ms: u64,

    pub prompt_target: usize,
    pub prompt_min: usize,
    pub difficulty_seed: Option<u64>,
    pub blocklist_path: Option<PathBuf>,
}

impl AppConfig {
    /// Whether any answer engine has credentials configured.
    #[must_use]
    pub fn has_answer_engine(&self) -> bool {
        self.perplexity_api_key.is_some() || self.serpapi_key.is_some()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[redacted]");
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("trusted_proxies", &self.trusted_proxies)
            .field("database_url", &redact(&self.database_url))
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("anthropic_api_key", &"[redacted]")
            .field("llm_model", &self.llm_model)
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("llm_max_retries", &self.llm_max_retries)
            .field("perplexity_api_key", &redact(&self.perplexity_api_key))
            .field("serpapi_key", &redact(&self.serpapi_key))
            .field("scraper_api_key", &redact(&self.scraper_api_key))
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("proxy_timeout_secs", &self.proxy_timeout_secs)
            .field("engine_timeout_secs", &self.engine_timeout_secs)
            .field("fetch_user_agent", &self.fetch_user_agent)
            .field("scan_max_prompts", &self.scan_max_prompts)
            .field("scan_batch_size", &self.scan_batch_size)
            .field("scan_batch_delay_ms", &self.scan_batch_delay_ms)
            .field("prompt_target", &self.prompt_target)
            .field("prompt_min", &self.prompt_min)
            .field("difficulty_seed", &self.difficulty_seed)
            .field("blocklist_path", &self.blocklist_path)
            .finish()
    }
}
