use std::sync::Arc;

use teun_core::{Difficulty, Intent, Prompt, PromptStatus, TrendSignal};
use teun_llm::{AnthropicClient, CompletionClient};
use teun_scanner::{engines_from_config, MentionScanner, ResponseParser, ScanSettings, ScanTarget};

pub(crate) fn ad_hoc_prompts(texts: &[String]) -> Vec<Prompt> {
    texts
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .enumerate()
        .map(|(id, text)| Prompt {
            id,
            text: text.to_string(),
            intent: Intent::Commercial,
            intent_cluster: "Ad hoc".to_string(),
            core_keyword: None,
            trend_signal: TrendSignal::Stable,
            estimated_google_volume: 0,
            estimated_ai_volume: 0,
            difficulty: Difficulty::Medium,
            difficulty_score: 0,
            your_status: PromptStatus::NotScanned,
            top_competitors: Vec::new(),
            ai_mode_snippet: None,
        })
        .collect()
}

/// Scans the given prompts and prints one line per prompt.
///
/// # Errors
///
/// Returns an error if no answer engine is configured or a client cannot be
/// built. Individual engine failures are logged, not returned.
pub(crate) async fn run_scan(
    config: &teun_core::AppConfig,
    company: &str,
    domain: Option<&str>,
    texts: &[String],
) -> anyhow::Result<()> {
    let blocklist = Arc::new(teun_core::resolve_blocklist(config.blocklist_path.as_deref())?);
    let engines = engines_from_config(config, &blocklist)?;
    if engines.is_empty() {
        anyhow::bail!("no answer engine configured; set PERPLEXITY_API_KEY or SERPAPI_KEY");
    }
    let llm: Arc<dyn CompletionClient> = Arc::new(AnthropicClient::from_app_config(config)?);
    let parser = ResponseParser::new(blocklist).with_llm(llm);

    let mut settings = ScanSettings::from_app_config(config);
    settings.max_prompts = texts.len();
    let scanner = MentionScanner::new(engines, parser, settings);

    let mut prompts = ad_hoc_prompts(texts);
    let target = ScanTarget {
        company: company.to_string(),
        domain: domain.map(str::to_string),
    };
    let summary = scanner.scan(&mut prompts, &target).await;

    for prompt in &prompts {
        let status = match prompt.your_status {
            PromptStatus::Found => "FOUND",
            PromptStatus::NotFound => "absent",
            PromptStatus::NotScanned => "-",
        };
        println!("{status:<8}{}", prompt.text);
        if !prompt.top_competitors.is_empty() {
            println!("        competitors: {}", prompt.top_competitors.join(", "));
        }
    }
    println!();
    println!(
        "{} scanned, {} mention {company}, {} failed",
        summary.selected, summary.found, summary.failed
    );
    Ok(())
}
