//! Full discovery runs against a local site, a scripted model and fake engines.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use teun_core::{Blocklist, PromptStatus};
use teun_llm::{CompletionClient, CompletionRequest, LlmError, PromptPolicy};
use teun_pipeline::{DiscoveryPipeline, DiscoveryRequest, PipelineError, Tier};
use teun_scanner::{
    AnswerEngine, EngineAnswer, EngineKind, MentionScanner, ResponseParser, ScanError,
    ScanSettings, SelectionPolicy,
};
use teun_scraper::{FetcherConfig, PageFetcher};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Replies keyed by `max_tokens`, which differs per stage.
struct Scripted {
    replies: HashMap<u32, String>,
    seen: Mutex<Vec<CompletionRequest>>,
}

impl Scripted {
    fn new(replies: &[(u32, String)]) -> Arc<Self> {
        Arc::new(Self {
            replies: replies.iter().cloned().collect(),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls_with(&self, max_tokens: u32) -> Vec<CompletionRequest> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.max_tokens == max_tokens)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl CompletionClient for Scripted {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.seen.lock().unwrap().push(request.clone());
        self.replies
            .get(&request.max_tokens)
            .cloned()
            .ok_or(LlmError::EmptyResponse)
    }
}

struct SameAnswer {
    text: String,
    calls: Mutex<usize>,
}

#[async_trait]
impl AnswerEngine for SameAnswer {
    fn kind(&self) -> EngineKind {
        EngineKind::Perplexity
    }

    async fn answer(&self, _prompt: &str) -> Result<EngineAnswer, ScanError> {
        *self.calls.lock().unwrap() += 1;
        Ok(EngineAnswer {
            text: self.text.clone(),
            citations: vec![],
        })
    }
}

const PROFILE_TOKENS: u32 = 800;
const FALLBACK_TOKENS: u32 = 500;
const GENERATOR_TOKENS: u32 = 8_000;

fn generated(n: usize, topic: &str) -> String {
    let items: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "text": format!("Welke {topic} in Utrecht is het beste, optie {i}?"),
                "intent": if i % 4 == 0 { "informational" } else { "commercial" },
                "intentCluster": format!("Cluster {}", i % 11),
                "coreKeyword": topic,
                "trendSignal": "stable",
                "estimatedGoogleVolume": 1000,
                "difficulty": "medium"
            })
        })
        .collect();
    Value::Array(items).to_string()
}

fn profile_reply() -> String {
    json!({
        "keywords": ["zuurdesembrood", "bakker utrecht", "taart bestellen"],
        "companyName": "Bakkerij Jansen",
        "category": "bakkerij",
        "location": "Utrecht",
        "services": ["brood", "taarten"]
    })
    .to_string()
}

fn homepage() -> String {
    format!(
        "<html><head><title>Bakkerij Jansen</title>\
         <meta name=\"description\" content=\"Ambachtelijk brood\"></head>\
         <body><h1>Ambachtelijke bakker in Utrecht</h1><p>{}</p></body></html>",
        "Elke ochtend vers zuurdesembrood en taarten op bestelling. ".repeat(15)
    )
}

const CHALLENGE: &str = "<html><head><title>Just a moment...</title></head>\
<body>Checking your browser before accessing the site.</body></html>";

fn fetcher() -> PageFetcher {
    PageFetcher::new(&FetcherConfig {
        fetch_timeout_secs: 5,
        proxy_timeout_secs: 5,
        user_agent: "teun-test/0.1".to_string(),
        proxy_api_key: None,
    })
    .unwrap()
}

fn scanner(engines: Vec<Arc<dyn AnswerEngine>>) -> MentionScanner {
    MentionScanner::new(
        engines,
        ResponseParser::new(Arc::new(Blocklist::builtin())),
        ScanSettings {
            max_prompts: 10,
            batch_size: 3,
            batch_delay: Duration::ZERO,
            policy: SelectionPolicy::default(),
        },
    )
}

fn pipeline(llm: Arc<Scripted>, engines: Vec<Arc<dyn AnswerEngine>>) -> DiscoveryPipeline {
    DiscoveryPipeline::new(
        fetcher(),
        llm,
        scanner(engines),
        PromptPolicy::default(),
        Some(7),
    )
}

fn request(body: Value) -> DiscoveryRequest {
    serde_json::from_value(body).unwrap()
}

#[tokio::test]
async fn manual_keyword_run_skips_extraction() {
    let llm = Scripted::new(&[(GENERATOR_TOKENS, generated(50, "taart"))]);
    let pipeline = pipeline(Arc::clone(&llm), vec![]);

    let response = pipeline
        .run(
            &request(json!({
                "keyword": "taart bestellen",
                "branche": "bakkerij",
                "serviceArea": "Utrecht"
            })),
            "sess-1",
        )
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.prompts.len(), 50);
    assert_eq!(response.meta.total_generated, 50);
    assert_eq!(response.meta.hidden_count, 0);
    assert_eq!(response.meta.tier, Tier::Free);
    assert!(!response.meta.scanned_on_google_ai);
    assert_eq!(response.clusters.len(), 11);
    assert!(response.top_competitors.is_empty());
    assert!(response.extracted.is_none());
    assert!(response.source.is_none());
    assert_eq!(response.session_token, "sess-1");
    assert!(response
        .prompts
        .iter()
        .all(|p| p.your_status == PromptStatus::NotScanned));

    assert!(llm.calls_with(PROFILE_TOKENS).is_empty());
    let generator_calls = llm.calls_with(GENERATOR_TOKENS);
    assert_eq!(generator_calls.len(), 1);
    assert!(generator_calls[0].user.contains("ZOEKWOORD: \"taart bestellen\""));
}

#[tokio::test]
async fn missing_input_is_rejected_before_any_call() {
    let llm = Scripted::new(&[]);
    let pipeline = pipeline(Arc::clone(&llm), vec![]);

    let result = pipeline
        .run(&request(json!({"brandName": "Bakkerij Jansen", "url": " "})), "s")
        .await;

    assert!(matches!(result, Err(PipelineError::MissingInput)));
    assert!(llm.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn website_run_uses_inferred_profile() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(homepage()))
        .mount(&site)
        .await;

    let llm = Scripted::new(&[
        (PROFILE_TOKENS, profile_reply()),
        (GENERATOR_TOKENS, generated(40, "bakker")),
    ]);
    let pipeline = pipeline(Arc::clone(&llm), vec![]);

    let response = pipeline
        .run(&request(json!({"url": site.uri()})), "s")
        .await
        .unwrap();

    assert_eq!(response.company_name, "Bakkerij Jansen");
    assert_eq!(
        response.extracted_keywords,
        vec!["zuurdesembrood", "bakker utrecht", "taart bestellen"]
    );
    let extracted = response.extracted.unwrap();
    assert_eq!(extracted.category.as_deref(), Some("bakkerij"));
    let source = response.source.unwrap();
    assert_eq!(source.title.as_deref(), Some("Bakkerij Jansen"));
    assert_eq!(source.h1.as_deref(), Some("Ambachtelijke bakker in Utrecht"));
    assert_eq!(source.method, "direct");
    assert_eq!(response.prompts.len(), 40);

    let user = &llm.calls_with(GENERATOR_TOKENS)[0].user;
    assert!(user.contains("zuurdesembrood"));
    assert!(user.contains("Noem \"Bakkerij Jansen\" in geen enkele vraag."));
}

#[tokio::test]
async fn blocked_site_falls_back_to_industry_keywords() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHALLENGE))
        .mount(&site)
        .await;

    let llm = Scripted::new(&[
        (
            FALLBACK_TOKENS,
            json!({"keywords": ["bakker utrecht", "verse croissants"]}).to_string(),
        ),
        (GENERATOR_TOKENS, generated(30, "bakker")),
    ]);
    let pipeline = pipeline(Arc::clone(&llm), vec![]);

    let response = pipeline
        .run(
            &request(json!({"url": site.uri(), "industry": "bakkerij", "location": "Utrecht"})),
            "s",
        )
        .await
        .unwrap();

    let source = response.source.unwrap();
    assert_eq!(source.method, "failed");
    assert_eq!(source.title.as_deref(), Some("127.0.0.1 (scrape failed)"));
    assert!(response.extracted.is_none());
    assert_eq!(
        response.extracted_keywords,
        vec!["bakker utrecht", "verse croissants"]
    );
    assert!(llm.calls_with(PROFILE_TOKENS).is_empty());
    assert!(llm.calls_with(GENERATOR_TOKENS)[0]
        .user
        .contains("verse croissants"));
}

#[tokio::test]
async fn failed_fallback_still_generates_from_industry() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&site)
        .await;

    let llm = Scripted::new(&[(GENERATOR_TOKENS, generated(30, "bakker"))]);
    let pipeline = pipeline(Arc::clone(&llm), vec![]);

    let response = pipeline
        .run(&request(json!({"url": site.uri(), "industry": "bakkerij"})), "s")
        .await
        .unwrap();

    assert!(response.extracted_keywords.is_empty());
    assert_eq!(llm.calls_with(FALLBACK_TOKENS).len(), 1);
    assert!(llm.calls_with(GENERATOR_TOKENS)[0]
        .user
        .contains("ZOEKWOORD: \"bakkerij\""));
}

#[tokio::test]
async fn too_few_prompts_is_an_error() {
    let llm = Scripted::new(&[(GENERATOR_TOKENS, generated(10, "taart"))]);
    let pipeline = pipeline(llm, vec![]);

    let result = pipeline
        .run(&request(json!({"keyword": "taart"})), "s")
        .await;
    assert!(matches!(
        result,
        Err(PipelineError::Llm(LlmError::TooFewPrompts { got: 10, .. }))
    ));
}

fn competitor_engine() -> Arc<SameAnswer> {
    Arc::new(SameAnswer {
        text: "Goede bakkers in Utrecht:\n\
               1. **Bakkerij Noord** - bekend om zuurdesem\n\
               2. **Broodhuis Zuid** - ruime openingstijden"
            .to_string(),
        calls: Mutex::new(0),
    })
}

#[tokio::test]
async fn pro_scan_marks_selected_prompts() {
    let engine = competitor_engine();
    let llm = Scripted::new(&[(GENERATOR_TOKENS, generated(30, "taart"))]);
    let pipeline = pipeline(llm, vec![engine.clone() as Arc<dyn AnswerEngine>]);

    let response = pipeline
        .run(
            &request(json!({
                "keyword": "taart",
                "brandName": "Bakkerij Jansen",
                "scanCompetitors": true,
                "tier": "pro"
            })),
            "s",
        )
        .await
        .unwrap();

    assert!(response.meta.scanned_on_google_ai);
    assert_eq!(*engine.calls.lock().unwrap(), 10);
    let not_found = response
        .prompts
        .iter()
        .filter(|p| p.your_status == PromptStatus::NotFound)
        .count();
    assert_eq!(not_found, 10);
    assert_eq!(response.top_competitors.len(), 2);
    assert!(response.top_competitors.iter().all(|c| c.count == 10));
    assert!(response
        .top_competitors
        .iter()
        .any(|c| c.name == "Bakkerij Noord"));
}

#[tokio::test]
async fn free_tier_never_scans() {
    let engine = competitor_engine();
    let llm = Scripted::new(&[(GENERATOR_TOKENS, generated(30, "taart"))]);
    let pipeline = pipeline(llm, vec![engine.clone() as Arc<dyn AnswerEngine>]);

    let response = pipeline
        .run(
            &request(json!({"keyword": "taart", "scanCompetitors": true})),
            "s",
        )
        .await
        .unwrap();

    assert!(!response.meta.scanned_on_google_ai);
    assert_eq!(*engine.calls.lock().unwrap(), 0);
    assert!(response.top_competitors.is_empty());
}
