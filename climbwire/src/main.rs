/*
climbwire - single-binary crawl driver.
Fetches the configured feeds once, optionally enriches the ranked articles
(genre, AI summary, four-language localization) and writes the result as
JSON to stdout or a file.
*/

use anyhow::{Context, Result};
use clap::Parser;
use common::{Article, Config};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use climbwire::crawler;
use climbwire::feed::MAX_SUMMARY_CHARS;
use climbwire::llm::enrich::Enricher;
use climbwire::llm::gemini::GeminiClient;
use climbwire::localize::{localize_article, ArticleLocalization};
use climbwire::page;

#[derive(Parser, Debug)]
#[command(name = "climbwire", about = "ClimbWire climbing-news crawl + enrichment")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Skip AI enrichment even when [enrichment] is configured
    #[arg(long)]
    no_enrich: bool,

    /// Skip the per-article AI summary rewrite (still translates/classifies)
    #[arg(long)]
    no_summarize: bool,

    /// Write JSON output here instead of stdout
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// One ranked article plus its localized variants, as handed to consumers.
#[derive(Debug, Serialize)]
struct EnrichedArticle {
    #[serde(flatten)]
    article: Article,
    #[serde(skip_serializing_if = "Option::is_none")]
    localized: Option<ArticleLocalization>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // Resolve config paths: built-in defaults, overlaid by config.default.toml
    // and then config.toml (or --config).
    let default_path = PathBuf::from("config.default.toml");
    let override_path = if let Some(p) = args.config {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        Some(p)
    } else {
        let p = PathBuf::from("config.toml");
        if p.exists() {
            Some(p)
        } else {
            None
        }
    };

    let config = Config::load_with_defaults(
        if default_path.exists() {
            Some(&default_path)
        } else {
            None
        },
        override_path.as_deref(),
    )
    .await
    .context("failed to load configuration")?;
    info!(
        sources = config.sources.len(),
        top_n = config.crawl.top_n,
        "configuration loaded"
    );

    let client = crawler::http_client(&config)?;
    let mut articles = crawler::crawl_news(&client, &config).await;

    // Backfill item images from the article pages where the feed had none.
    for article in articles.iter_mut().filter(|a| a.image_url.is_none()) {
        match page::extract_image_from_page(&client, &article.url).await {
            Ok(Some(image)) => article.image_url = Some(image),
            Ok(None) => {}
            Err(e) => warn!(url = %article.url, error = %e, "page image extraction failed"),
        }
    }

    let enricher = if args.no_enrich {
        info!("enrichment disabled via CLI (--no-enrich)");
        None
    } else {
        build_enricher(&config)
    };

    let mut output = Vec::with_capacity(articles.len());
    for mut article in articles {
        let localized = match &enricher {
            Some(enricher) => {
                article.genre =
                    Some(enricher.classify_genre(&article.title, &article.summary).await);
                if !args.no_summarize {
                    // AI summary in the source language; translations below
                    // derive from it. The parse-time length cap still holds.
                    article.summary = enricher
                        .summarize(&article.summary, &article.language)
                        .await
                        .chars()
                        .take(MAX_SUMMARY_CHARS)
                        .collect();
                }
                Some(localize_article(enricher, &article).await)
            }
            None => None,
        };
        output.push(EnrichedArticle { article, localized });
    }

    let json = serde_json::to_string_pretty(&output).context("failed to serialize articles")?;
    match args.output {
        Some(path) => {
            tokio::fs::write(&path, &json)
                .await
                .with_context(|| format!("failed to write output file: {}", path.display()))?;
            info!(path = %path.display(), articles = output.len(), "wrote crawl output");
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// Builds the enrichment client from config, reading the API key from the
/// configured environment variable. A missing section or key disables
/// enrichment rather than failing the crawl.
fn build_enricher(config: &Config) -> Option<Enricher> {
    let enrichment = match &config.enrichment {
        Some(enrichment) => enrichment,
        None => {
            info!("no [enrichment] config section, running crawl-only");
            return None;
        }
    };

    let api_key = match std::env::var(&enrichment.api_key_env) {
        Ok(key) if !key.is_empty() => key,
        _ => {
            warn!(env = %enrichment.api_key_env, "enrichment API key env var not set, running crawl-only");
            return None;
        }
    };

    let model = GeminiClient::new(&enrichment.api_url, api_key, &enrichment.model)
        .with_timeout(enrichment.timeout_seconds);
    Some(Enricher::new(Arc::new(model)))
}
