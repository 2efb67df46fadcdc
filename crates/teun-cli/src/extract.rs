use teun_llm::{infer_keywords, AnthropicClient};
use teun_scraper::{extract_context, FetcherConfig, PageFetcher};

/// Reads a site and prints the page context and inferred keyword profile.
///
/// # Errors
///
/// Returns an error if a client cannot be built or keyword inference fails.
/// A failed scrape is reported, not returned as an error.
pub(crate) async fn run_extract(config: &teun_core::AppConfig, url: &str) -> anyhow::Result<()> {
    let fetcher = PageFetcher::new(&FetcherConfig::from_app_config(config))?;
    let extraction = extract_context(&fetcher, url).await;

    println!("URL: {}", extraction.url);
    println!("Method: {}", extraction.method);
    let Some(page) = extraction.context.as_ref() else {
        println!("No usable page content for {}", extraction.domain);
        return Ok(());
    };

    println!("Title: {}", page.title.as_deref().unwrap_or("-"));
    println!("Description: {}", page.meta_desc.as_deref().unwrap_or("-"));
    if !page.h1s.is_empty() {
        println!("H1: {}", page.h1s.join(" | "));
    }
    if !page.service_links.is_empty() {
        println!("Service links: {}", page.service_links.join(", "));
    }
    println!("Body: {} chars", page.body.chars().count());

    let llm = AnthropicClient::from_app_config(config)?;
    let profile = infer_keywords(&llm, page).await?;
    println!();
    println!("Company: {}", profile.company_name.as_deref().unwrap_or("-"));
    println!("Category: {}", profile.category.as_deref().unwrap_or("-"));
    println!("Location: {}", profile.location.as_deref().unwrap_or("-"));
    println!("Keywords:");
    for keyword in &profile.keywords {
        println!("  {keyword}");
    }
    if !profile.services.is_empty() {
        println!("Services: {}", profile.services.join(", "));
    }
    Ok(())
}
