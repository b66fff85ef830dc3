use std::sync::Arc;

use climbwire::llm::enrich::Enricher;
use climbwire::llm::gemini::GeminiClient;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let api_key =
        std::env::var("GEMINI_API_KEY").expect("Set GEMINI_API_KEY environment variable");

    let base_url = std::env::var("GEMINI_API_URL")
        .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string());
    let model =
        std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash-exp".to_string());

    println!("\n{}", "=".repeat(60));
    println!("Testing enrichment client");
    println!("Base URL: {base_url}");
    println!("Model: {model}");
    println!("{}", "=".repeat(60));

    let client = GeminiClient::new(&base_url, &api_key, &model).with_timeout(30);
    let enricher = Enricher::new(Arc::new(client));

    let title = "Janja Garnbret sends her hardest boulder yet, a V15 in Magic Wood";
    let content = "Slovenian superstar Janja Garnbret has climbed her hardest \
                   boulder problem to date, topping out a V15 in Magic Wood, \
                   Switzerland after three days of effort. The problem features \
                   a long compression crux on slopers followed by a committing \
                   top-out. Garnbret, already a multiple World Cup champion and \
                   Olympic gold medalist, called it her proudest outdoor send.";

    println!("\n[Test 1] Translating title to Japanese...");
    let translated = enricher.translate(title, "en", "ja").await;
    println!("✓ {translated}");

    println!("\n[Test 2] Classifying genre...");
    let genre = enricher.classify_genre(title, content).await;
    println!("✓ {genre}");

    println!("\n[Test 3] Summarizing...");
    let summary = enricher.summarize(content, "en").await;
    println!("✓ {summary}");

    println!("\n{}", "=".repeat(60));
    println!("Tests completed");
    println!("{}", "=".repeat(60));
}
