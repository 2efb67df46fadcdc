use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Browser-like agent used for direct page fetches; many small-business hosts
/// serve a challenge page to anything that does not look like Chrome.
pub const DEFAULT_FETCH_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can pass a `HashMap` lookup.
///
/// # Errors
///
/// Returns [`ConfigError`] when a required variable is missing or a value
/// does not parse.
pub fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::{IpAddr, SocketAddr};
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let anthropic_api_key = require("ANTHROPIC_API_KEY")?;

    let env = parse_environment(&or_default("TEUN_ENV", "development"));
    let bind_addr = parse_addr("TEUN_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("TEUN_LOG_LEVEL", "info");
    let trusted_proxies = optional("TEUN_TRUSTED_PROXIES")
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| {
                    v.parse::<IpAddr>()
                        .map_err(|e| invalid("TEUN_TRUSTED_PROXIES", format!("{v}: {e}")))
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?
        .unwrap_or_default();

    let database_url = optional("DATABASE_URL");
    let db_max_connections = parse_u32("TEUN_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("TEUN_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("TEUN_DB_ACQUIRE_TIMEOUT_SECS", "30")?;

    let llm_model = or_default("TEUN_LLM_MODEL", "claude-sonnet-4-20250514");
    let llm_base_url = or_default("TEUN_LLM_BASE_URL", "https://api.anthropic.com/v1");
    let llm_timeout_secs = parse_u64("TEUN_LLM_TIMEOUT_SECS", "90")?;
    let llm_max_retries = parse_u32("TEUN_LLM_MAX_RETRIES", "2")?;

    let perplexity_api_key = optional("PERPLEXITY_API_KEY");
    let serpapi_key = optional("SERPAPI_KEY");
    let scraper_api_key = optional("SCRAPER_API_KEY");

    let fetch_timeout_secs = parse_u64("TEUN_FETCH_TIMEOUT_SECS", "10")?;
    let proxy_timeout_secs = parse_u64("TEUN_PROXY_TIMEOUT_SECS", "30")?;
    let engine_timeout_secs = parse_u64("TEUN_ENGINE_TIMEOUT_SECS", "20")?;
    let fetch_user_agent = or_default("TEUN_FETCH_USER_AGENT", DEFAULT_FETCH_USER_AGENT);

    let scan_max_prompts = parse_usize("TEUN_SCAN_MAX_PROMPTS", "10")?;
    let scan_batch_size = parse_usize("TEUN_SCAN_BATCH_SIZE", "3")?;
    if scan_batch_size == 0 {
        return Err(invalid("TEUN_SCAN_BATCH_SIZE", "must be at least 1".to_string()));
    }
    let scan_batch_delay_ms = parse_u64("TEUN_SCAN_BATCH_DELAY_MS", "1000")?;

    let prompt_target = parse_usize("TEUN_PROMPT_TARGET", "50")?;
    let prompt_min = parse_usize("TEUN_PROMPT_MIN", "25")?;
    if prompt_min > prompt_target {
        return Err(invalid(
            "TEUN_PROMPT_MIN",
            format!("{prompt_min} exceeds TEUN_PROMPT_TARGET ({prompt_target})"),
        ));
    }

    let difficulty_seed = match optional("TEUN_DIFFICULTY_SEED") {
        Some(raw) => Some(
            raw.parse::<u64>()
                .map_err(|e| invalid("TEUN_DIFFICULTY_SEED", e.to_string()))?,
        ),
        None => None,
    };
    let blocklist_path = optional("TEUN_BLOCKLIST_PATH").map(PathBuf::from);

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        trusted_proxies,
        database_url,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        anthropic_api_key,
        llm_model,
        llm_base_url,
        llm_timeout_secs,
        llm_max_retries,
        perplexity_api_key,
        serpapi_key,
        scraper_api_key,
        fetch_timeout_secs,
        proxy_timeout_secs,
        engine_timeout_secs,
        fetch_user_agent,
        scan_max_prompts,
        scan_batch_size,
        scan_batch_delay_ms,
        prompt_target,
        prompt_min,
        difficulty_seed,
        blocklist_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
