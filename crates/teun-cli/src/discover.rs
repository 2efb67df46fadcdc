use std::sync::Arc;

use clap::{ArgGroup, Args};
use teun_core::PromptStatus;
use teun_pipeline::{
    resolve_session_token, DiscoveryPipeline, DiscoveryRequest, DiscoveryResponse, Tier,
};

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("input").required(true).args(["url", "keyword"])))]
pub struct DiscoverArgs {
    /// Company website to read
    #[arg(long)]
    pub url: Option<String>,
    /// Core search term when there is no website
    #[arg(long)]
    pub keyword: Option<String>,
    /// Brand name, kept out of the generated prompts
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub industry: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    /// Scan the top prompts on the configured answer engines
    #[arg(long)]
    pub scan: bool,
    /// Account tier; defaults to `pro` with --scan, `free` otherwise
    #[arg(long, value_parser = ["free", "pro"])]
    pub tier: Option<String>,
    /// Print the full response as JSON
    #[arg(long)]
    pub json: bool,
}

impl DiscoverArgs {
    pub(crate) fn to_request(&self) -> DiscoveryRequest {
        let tier = match self.tier.as_deref() {
            Some(name) => Tier::from_name(name),
            None if self.scan => Tier::Pro,
            None => Tier::Free,
        };
        DiscoveryRequest {
            url: self.url.clone(),
            keyword: self.keyword.clone(),
            brand_name: self.brand.clone(),
            industry: self.industry.clone(),
            location: self.location.clone(),
            scan_competitors: self.scan,
            tier,
            ..DiscoveryRequest::default()
        }
    }
}

/// Runs one discovery and prints it.
///
/// # Errors
///
/// Returns an error if the pipeline cannot be built or the run fails.
pub(crate) async fn run_discover(
    config: &teun_core::AppConfig,
    args: &DiscoverArgs,
) -> anyhow::Result<()> {
    let blocklist = Arc::new(teun_core::resolve_blocklist(config.blocklist_path.as_deref())?);
    let pipeline = DiscoveryPipeline::from_app_config(config, blocklist)?;
    if args.scan && !pipeline.scanner().is_enabled() {
        tracing::warn!("--scan given but no answer engine is configured; skipping scan");
    }

    let response = pipeline
        .run(&args.to_request(), &resolve_session_token(None))
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_summary(&response);
    }
    Ok(())
}

fn status_label(s: PromptStatus) -> &'static str {
    match s {
        PromptStatus::Found => "found",
        PromptStatus::NotFound => "absent",
        PromptStatus::NotScanned => "-",
    }
}

fn print_summary(response: &DiscoveryResponse) {
    if !response.company_name.is_empty() {
        println!("Company: {}", response.company_name);
    }
    if !response.extracted_keywords.is_empty() {
        println!("Keywords: {}", response.extracted_keywords.join(", "));
    }
    println!(
        "{} prompts in {} clusters (tier {}, scanned: {})",
        response.meta.total_generated,
        response.clusters.len(),
        response.meta.tier,
        response.meta.scanned_on_google_ai
    );

    for cluster in &response.clusters {
        println!();
        println!(
            "## {} (volume {}, avg difficulty {}, {} easy)",
            cluster.name, cluster.total_volume, cluster.avg_difficulty, cluster.high_opp
        );
        println!("{:<8}{:<8}{:<8}PROMPT", "AI VOL", "DIFF", "STATUS");
        for prompt in &cluster.prompts {
            println!(
                "{:<8}{:<8}{:<8}{}",
                prompt.estimated_ai_volume,
                format!("{} {}", prompt.difficulty, prompt.difficulty_score),
                status_label(prompt.your_status),
                prompt.text
            );
        }
    }

    if !response.top_competitors.is_empty() {
        println!();
        println!("Top competitors:");
        for competitor in &response.top_competitors {
            println!("  {:<40}{}", competitor.name, competitor.count);
        }
    }
}
