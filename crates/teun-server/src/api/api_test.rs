use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use serde_json::{json, Value};
use teun_core::Blocklist;
use teun_llm::{CompletionClient, CompletionRequest, LlmError, PromptPolicy};
use teun_scanner::{MentionScanner, ResponseParser, ScanSettings};
use teun_scraper::{FetcherConfig, PageFetcher};
use tower::ServiceExt;

use super::*;

/// Returns the same generator output for every call, or fails every call.
struct Canned(Option<String>);

#[async_trait]
impl CompletionClient for Canned {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
        self.0.clone().ok_or(LlmError::EmptyResponse)
    }
}

fn generated(n: usize) -> String {
    let items: Vec<Value> = (0..n)
        .map(|i| {
            json!({
                "text": format!("Wat kost een nieuwe dakgoot laten plaatsen, vraag {i}?"),
                "intent": "commercial",
                "intentCluster": format!("Cluster {}", i % 10),
                "trendSignal": "rising",
                "estimatedGoogleVolume": 800,
                "difficulty": "easy"
            })
        })
        .collect();
    Value::Array(items).to_string()
}

fn pipeline(reply: Option<String>) -> Arc<DiscoveryPipeline> {
    let fetcher = PageFetcher::new(&FetcherConfig {
        fetch_timeout_secs: 2,
        proxy_timeout_secs: 2,
        user_agent: "teun-test/0.1".to_string(),
        proxy_api_key: None,
    })
    .expect("fetcher");
    let scanner = MentionScanner::new(
        vec![],
        ResponseParser::new(Arc::new(Blocklist::builtin())),
        ScanSettings::default(),
    );
    Arc::new(DiscoveryPipeline::new(
        fetcher,
        Arc::new(Canned(reply)),
        scanner,
        PromptPolicy::default(),
        None,
    ))
}

fn app(reply: Option<String>, pool: Option<PgPool>) -> Router {
    build_app(
        AppState {
            pipeline: pipeline(reply),
            pool,
        },
        default_rate_limit_state(),
    )
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/prompt-discovery")
        .header("content-type", "application/json")
        .header("x-session-token", "sessie-42")
        .body(Body::from(body.to_string()))
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

#[test]
fn api_error_codes_map_to_status() {
    let cases = [
        ("bad_request", StatusCode::BAD_REQUEST),
        ("not_found", StatusCode::NOT_FOUND),
        ("rate_limited", StatusCode::TOO_MANY_REQUESTS),
        ("unavailable", StatusCode::SERVICE_UNAVAILABLE),
        ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, status) in cases {
        let response = ApiError::new("req-1", code, "x").into_response();
        assert_eq!(response.status(), status, "{code}");
    }
}

#[test]
fn normalize_limit_applies_defaults_and_bounds() {
    assert_eq!(normalize_limit(None), 10);
    assert_eq!(normalize_limit(Some(0)), 1);
    assert_eq!(normalize_limit(Some(1_000)), 50);
}

#[tokio::test]
async fn health_without_database_reports_disabled() {
    let response = app(None, None)
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header("x-request-id", "req-health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-health");
    let json = body_json(response).await;
    assert_eq!(json["data"]["database"], "disabled");
    assert_eq!(json["meta"]["request_id"], "req-health");
}

#[tokio::test]
async fn discovery_with_keyword_returns_prompts() {
    let response = app(Some(generated(30)), None)
        .oneshot(post_json(r#"{"keyword": "dakgoot vervangen", "location": "Zwolle"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["sessionToken"], "sessie-42");
    assert_eq!(json["prompts"].as_array().map(Vec::len), Some(30));
    assert_eq!(json["meta"]["totalGenerated"], 30);
    assert_eq!(json["meta"]["scannedOnGoogleAi"], false);
    assert_eq!(json["prompts"][0]["yourStatus"], "not_scanned");
    assert!(json["source"].is_null());
}

#[tokio::test]
async fn discovery_without_input_is_bad_request() {
    let response = app(Some(generated(30)), None)
        .oneshot(post_json(r#"{"brandName": "Dakwerken Zwolle"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "bad_request");
    assert_eq!(json["error"]["message"], "Vul een URL of zoekwoord in");
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let response = app(None, None)
        .oneshot(post_json("{not json"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["error"]["message"],
        "Ongeldig verzoek. Controleer de invoer."
    );
}

#[tokio::test]
async fn unknown_tier_runs_with_free_limits() {
    let response = app(Some(generated(30)), None)
        .oneshot(post_json(
            r#"{"keyword": "dakgoot vervangen", "tier": "business", "scanCompetitors": true}"#,
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["meta"]["tier"], "free");
    assert_eq!(json["meta"]["scannedOnGoogleAi"], false);
}

#[tokio::test]
async fn pipeline_failure_is_generic_500() {
    let response = app(None, None)
        .oneshot(post_json(r#"{"keyword": "dakgoot"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(
        json["error"]["message"],
        "Er ging iets mis. Probeer het opnieuw."
    );
}

#[tokio::test]
async fn discovery_is_rate_limited_per_client() {
    let app = build_app(
        AppState {
            pipeline: pipeline(None),
            pool: None,
        },
        crate::middleware::RateLimitState::new(1, Duration::from_secs(60)),
    );

    let first = app
        .clone()
        .oneshot(post_json("{}"))
        .await
        .expect("response");
    assert_eq!(first.status(), StatusCode::BAD_REQUEST);

    let second = app
        .clone()
        .oneshot(post_json("{}"))
        .await
        .expect("response");
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    let json = body_json(second).await;
    assert_eq!(json["error"]["code"], "rate_limited");
    assert!(json["meta"]["request_id"].as_str().is_some_and(|id| !id.is_empty()));

    // Health is outside the limiter.
    let health = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(health.status(), StatusCode::OK);
}

#[tokio::test]
async fn lookup_without_database_is_unavailable() {
    let id = uuid::Uuid::new_v4();
    let response = app(None, None)
        .oneshot(
            Request::builder()
                .uri(format!("/api/prompt-discovery/{id}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn lookup_with_invalid_id_is_bad_request() {
    let response = app(None, None)
        .oneshot(
            Request::builder()
                .uri("/api/prompt-discovery/not-a-uuid")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../migrations")]
async fn successful_run_is_stored_for_the_session(pool: sqlx::PgPool) {
    let app = app(Some(generated(30)), Some(pool));

    let response = app
        .clone()
        .oneshot(post_json(r#"{"keyword": "dakgoot vervangen", "branche": "dakdekker"}"#))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/prompt-discovery?session=sessie-42")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let rows = json["data"].as_array().expect("data array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["keyword"], "dakgoot vervangen");
    assert_eq!(rows[0]["industry"], "dakdekker");
    assert_eq!(rows[0]["prompts"].as_array().map(Vec::len), Some(30));

    let id = rows[0]["id"].as_str().expect("id").to_string();
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/prompt-discovery/{id}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["sessionToken"], "sessie-42");
}
