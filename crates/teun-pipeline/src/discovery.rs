//! End-to-end prompt discovery for one request.

use std::sync::Arc;

use teun_core::{
    build_clusters, domain_stem, tally_competitors, AppConfig, Blocklist, DifficultyScorer,
    KeywordProfile, Prompt,
};
use teun_llm::{
    fallback_keywords, infer_keywords, AnthropicClient, CompletionClient, GenerationInput,
    PromptGenerator, PromptPolicy,
};
use teun_scanner::{engines_from_config, MentionScanner, ResponseParser, ScanSettings, ScanTarget};
use teun_scraper::{extract_context, Extraction, FetcherConfig, PageFetcher};

use crate::error::PipelineError;
use crate::request::DiscoveryRequest;
use crate::response::{DiscoveryMeta, DiscoveryResponse, ExtractedSummary, SourceInfo};

const TOP_COMPETITORS: usize = 10;

/// What the extraction stages produced.
#[derive(Debug, Default)]
struct Context {
    /// Inferred from the page itself.
    inferred: Option<KeywordProfile>,
    /// Generated for the industry after a failed scrape.
    fallback_keywords: Vec<String>,
    source: Option<SourceInfo>,
    domain_stem: Option<String>,
}

fn source_from(extraction: &Extraction) -> SourceInfo {
    match &extraction.context {
        Some(ctx) => SourceInfo {
            title: ctx.title.clone(),
            meta_desc: ctx.meta_desc.clone(),
            h1: ctx.h1s.first().cloned(),
            method: extraction.method.to_string(),
        },
        None => SourceInfo {
            title: Some(format!("{} (scrape failed)", extraction.domain)),
            meta_desc: Some(String::new()),
            h1: Some(String::new()),
            method: extraction.method.to_string(),
        },
    }
}

pub struct DiscoveryPipeline {
    fetcher: PageFetcher,
    llm: Arc<dyn CompletionClient>,
    scanner: MentionScanner,
    policy: PromptPolicy,
    difficulty_seed: Option<u64>,
}

impl DiscoveryPipeline {
    #[must_use]
    pub fn new(
        fetcher: PageFetcher,
        llm: Arc<dyn CompletionClient>,
        scanner: MentionScanner,
        policy: PromptPolicy,
        difficulty_seed: Option<u64>,
    ) -> Self {
        Self {
            fetcher,
            llm,
            scanner,
            policy,
            difficulty_seed,
        }
    }

    /// Wires every stage from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if an HTTP client cannot be built.
    pub fn from_app_config(
        config: &AppConfig,
        blocklist: Arc<Blocklist>,
    ) -> Result<Self, PipelineError> {
        let fetcher = PageFetcher::new(&FetcherConfig::from_app_config(config))?;
        let llm: Arc<dyn CompletionClient> = Arc::new(AnthropicClient::from_app_config(config)?);
        let engines = engines_from_config(config, &blocklist)?;
        let parser = ResponseParser::new(blocklist).with_llm(Arc::clone(&llm));
        let scanner = MentionScanner::new(engines, parser, ScanSettings::from_app_config(config));
        Ok(Self::new(
            fetcher,
            llm,
            scanner,
            PromptPolicy::from_app_config(config),
            config.difficulty_seed,
        ))
    }

    #[must_use]
    pub fn scanner(&self) -> &MentionScanner {
        &self.scanner
    }

    #[must_use]
    pub fn fetcher(&self) -> &PageFetcher {
        &self.fetcher
    }

    #[must_use]
    pub fn llm(&self) -> &dyn CompletionClient {
        self.llm.as_ref()
    }

    async fn gather_context(&self, request: &DiscoveryRequest) -> Result<Context, PipelineError> {
        let Some(url) = request.url() else {
            return Ok(Context::default());
        };

        let extraction = extract_context(&self.fetcher, url).await;
        let mut context = Context {
            source: Some(source_from(&extraction)),
            domain_stem: domain_stem(&extraction.url),
            ..Context::default()
        };

        if let Some(page) = &extraction.context {
            context.inferred = Some(infer_keywords(self.llm.as_ref(), page).await?);
            return Ok(context);
        }

        if let Some(industry) = request.industry() {
            match fallback_keywords(self.llm.as_ref(), industry, request.location()).await {
                Ok(keywords) => {
                    tracing::info!(industry, count = keywords.len(), "using fallback keywords");
                    context.fallback_keywords = keywords;
                }
                Err(e) => {
                    tracing::warn!(industry, error = %e, "fallback keyword generation failed");
                }
            }
        }
        Ok(context)
    }

    fn generation_input(request: &DiscoveryRequest, context: &Context) -> GenerationInput {
        let profile = context.inferred.clone().or_else(|| {
            (!context.fallback_keywords.is_empty()).then(|| KeywordProfile {
                keywords: context.fallback_keywords.clone(),
                company_name: request.brand_name().map(str::to_string),
                category: request.industry().map(str::to_string),
                location: request.location().map(str::to_string),
                ..KeywordProfile::default()
            })
        });
        let manual_keyword = request
            .keyword()
            .or_else(|| request.industry())
            .or_else(|| request.brand_name())
            .map(str::to_string)
            .or_else(|| context.domain_stem.clone());

        GenerationInput {
            profile,
            manual_keyword,
            industry: request.industry().map(str::to_string),
            location: request.location().map(str::to_string),
            brand_name: request.brand_name().map(str::to_string),
        }
    }

    /// Runs every stage for `request`.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::MissingInput`] when neither a URL nor a keyword is given.
    /// - [`PipelineError::Llm`] when keyword inference or prompt generation fails.
    pub async fn run(
        &self,
        request: &DiscoveryRequest,
        session_token: &str,
    ) -> Result<DiscoveryResponse, PipelineError> {
        if !request.has_input() {
            return Err(PipelineError::MissingInput);
        }

        let context = self.gather_context(request).await?;
        let input = Self::generation_input(request, &context);
        let company_name = context
            .inferred
            .as_ref()
            .and_then(|p| p.company_name.clone())
            .or_else(|| request.brand_name().map(str::to_string))
            .unwrap_or_default();

        let mut scorer = DifficultyScorer::from_seed(self.difficulty_seed);
        let mut prompts: Vec<Prompt> = PromptGenerator::new(self.llm.as_ref(), self.policy)
            .generate(&input, &mut scorer)
            .await?;

        let scanned = request.wants_scan() && self.scanner.is_enabled();
        if scanned {
            let target = ScanTarget {
                company: company_name.clone(),
                domain: request.url().map(str::to_string),
            };
            self.scanner.scan(&mut prompts, &target).await;
        }

        let limits = request.tier.limits();
        let total_generated = prompts.len();
        let top_competitors = tally_competitors(&prompts, TOP_COMPETITORS);
        prompts.truncate(limits.max_prompts);
        let clusters = build_clusters(&prompts);

        tracing::info!(
            prompts = prompts.len(),
            clusters = clusters.len(),
            scanned,
            tier = %request.tier,
            "discovery complete"
        );

        Ok(DiscoveryResponse {
            success: true,
            meta: DiscoveryMeta {
                total_generated,
                total_visible: prompts.len(),
                hidden_count: total_generated.saturating_sub(prompts.len()),
                max_volumes: limits.max_volumes,
                tier: request.tier,
                scanned_on_google_ai: scanned,
            },
            prompts,
            clusters,
            top_competitors,
            extracted_keywords: context
                .inferred
                .as_ref()
                .map_or_else(|| context.fallback_keywords.clone(), |p| p.keywords.clone()),
            company_name,
            session_token: session_token.to_string(),
            extracted: context.inferred.as_ref().map(ExtractedSummary::from),
            source: context.source,
        })
    }
}
