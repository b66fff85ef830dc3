use common::Config;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = Config::default();
    let client = climbwire::crawler::http_client(&config).expect("build http client");

    for source in &config.sources {
        println!("\n{}", "=".repeat(60));
        println!("Testing: {} ({})", source.name, source.url);
        println!("{}", "=".repeat(60));

        let articles =
            climbwire::crawler::fetch_source(&client, source, config.crawl.max_items_per_feed)
                .await;

        if articles.is_empty() {
            println!("✗ No articles (fetch failed or feed empty)");
            continue;
        }

        println!("✓ {} articles", articles.len());
        for (i, article) in articles.iter().take(3).enumerate() {
            println!("  {}. {}", i + 1, article.title);
            println!("     URL: {}", article.url);
            println!(
                "     Published: {:?}, image: {}",
                article.published_date,
                article.image_url.as_deref().unwrap_or("none")
            );
        }
    }

    println!("\n{}", "=".repeat(60));
    println!("Full crawl (dedup + rank)");
    println!("{}", "=".repeat(60));
    let ranked = climbwire::crawler::crawl_news(&client, &config).await;
    for (i, article) in ranked.iter().enumerate() {
        println!("{:2}. [{}] {}", i + 1, article.source_name, article.title);
    }
}
