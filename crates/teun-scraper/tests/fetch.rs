//! Integration tests for `PageFetcher` and `extract_context`.
//!
//! Every test runs against a local `wiremock` server. Hosts are IP literals,
//! so the fetcher never attempts a `www.` variant.

use teun_scraper::{
    extract_context, ExtractionMethod, FetcherConfig, PageFetcher, ScraperError,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(proxy_api_key: Option<&str>) -> FetcherConfig {
    FetcherConfig {
        fetch_timeout_secs: 5,
        proxy_timeout_secs: 5,
        user_agent: "teun-test/0.1".to_string(),
        proxy_api_key: proxy_api_key.map(str::to_string),
    }
}

fn homepage() -> String {
    format!(
        "<html><head><title>Dakdekker Jansen</title></head><body><h1>Dakwerk in Utrecht</h1>\
         <nav><a href=\"/diensten\">Diensten</a></nav><p>{}</p></body></html>",
        "Wij repareren platte en schuine daken in de regio Utrecht. ".repeat(15)
    )
}

const CHALLENGE: &str = "<html><head><title>Just a moment...</title></head>\
<body>Checking your browser before accessing the site. Ray ID: 123</body></html>";

#[tokio::test]
async fn direct_fetch_returns_parsed_context() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(homepage()))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = PageFetcher::new(&config(None)).unwrap();
    let extraction = extract_context(&fetcher, &server.uri()).await;

    assert_eq!(extraction.method, ExtractionMethod::Direct);
    let ctx = extraction.context.expect("context");
    assert_eq!(ctx.title.as_deref(), Some("Dakdekker Jansen"));
    assert_eq!(ctx.h1s, vec!["Dakwerk in Utrecht"]);
    assert_eq!(ctx.nav_items, vec!["Diensten"]);
}

#[tokio::test]
async fn direct_fetch_sends_dutch_accept_language() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(wiremock::matchers::header("accept-language", "nl-NL,nl;q=0.9,en;q=0.8"))
        .respond_with(ResponseTemplate::new(200).set_body_string(homepage()))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = PageFetcher::new(&config(None)).unwrap();
    assert!(fetcher.fetch_direct(&server.uri()).await.is_ok());
}

#[tokio::test]
async fn short_direct_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<h1>Hoi</h1>"))
        .mount(&server)
        .await;

    let fetcher = PageFetcher::new(&config(None)).unwrap();
    let result = fetcher.fetch_direct(&server.uri()).await;
    assert!(
        matches!(result, Err(ScraperError::TooShort { len: 12, .. })),
        "expected TooShort, got: {result:?}"
    );
}

#[tokio::test]
async fn non_success_status_is_typed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let fetcher = PageFetcher::new(&config(None)).unwrap();
    let result = fetcher.fetch_direct(&server.uri()).await;
    assert!(matches!(
        result,
        Err(ScraperError::UnexpectedStatus { status: 503, .. })
    ));
}

#[tokio::test]
async fn challenge_page_without_proxy_reports_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHALLENGE))
        .mount(&server)
        .await;

    let fetcher = PageFetcher::new(&config(None)).unwrap();
    let result = fetcher.fetch(&server.uri()).await;
    assert!(matches!(result, Err(ScraperError::AllAttemptsFailed { .. })));

    let extraction = extract_context(&fetcher, &server.uri()).await;
    assert_eq!(extraction.method, ExtractionMethod::Failed);
    assert!(extraction.context.is_none());
    assert_eq!(extraction.domain, "127.0.0.1");
}

#[tokio::test]
async fn challenge_page_falls_back_to_proxy() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHALLENGE))
        .mount(&site)
        .await;

    let proxy = MockServer::start().await;
    let target = format!("{}/", site.uri());
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("api_key", "proxy-key"))
        .and(query_param("url", target.as_str()))
        .and(query_param("render", "true"))
        .and(query_param("premium", "true"))
        .and(query_param("country_code", "nl"))
        .respond_with(ResponseTemplate::new(200).set_body_string(homepage()))
        .expect(1)
        .mount(&proxy)
        .await;

    let fetcher = PageFetcher::new(&config(Some("proxy-key")))
        .unwrap()
        .with_proxy_base_url(&proxy.uri());
    let extraction = extract_context(&fetcher, &target).await;

    assert_eq!(extraction.method, ExtractionMethod::ScraperapiPremium);
    assert_eq!(
        extraction.context.unwrap().title.as_deref(),
        Some("Dakdekker Jansen")
    );
}

#[tokio::test]
async fn proxy_placeholder_is_still_a_failure() {
    let site = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&site)
        .await;

    let proxy = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<h1>example.nl</h1> This domain is for sale"),
        )
        .mount(&proxy)
        .await;

    let fetcher = PageFetcher::new(&config(Some("k")))
        .unwrap()
        .with_proxy_base_url(&proxy.uri());
    let extraction = extract_context(&fetcher, &site.uri()).await;
    assert!(!extraction.succeeded());
}

#[tokio::test]
async fn invalid_url_is_reported_without_network() {
    let fetcher = PageFetcher::new(&config(None)).unwrap();
    let result = fetcher.fetch("   ").await;
    assert!(matches!(result, Err(ScraperError::InvalidUrl { .. })));
}
