//! Multi-source crawl: per-feed fetch with isolated failures, then merge,
//! dedup, rank and truncate.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use common::{Article, Config, SourceConfig};
use futures::future::join_all;
use reqwest::Client;
use tracing::{info, warn};

use crate::feed::parse_feed;

/// Builds the shared HTTP client used for feed and article-page fetches.
pub fn http_client(config: &Config) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.crawl.fetch_timeout_seconds))
        .user_agent(config.crawl.user_agent.clone())
        .build()
        .context("failed to build reqwest client")
}

/// Fetches one feed and parses it into Articles.
///
/// Any transport failure, non-success status or unreadable body is logged
/// and yields an empty list; a broken source must never take down the crawl.
pub async fn fetch_source(
    client: &Client,
    source: &SourceConfig,
    max_items: usize,
) -> Vec<Article> {
    let response = match client.get(&source.url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!(source = %source.name, url = %source.url, error = %e, "feed fetch failed");
            return Vec::new();
        }
    };

    let status = response.status();
    if !status.is_success() {
        warn!(source = %source.name, url = %source.url, %status, "feed fetch returned non-success status");
        return Vec::new();
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(source = %source.name, url = %source.url, error = %e, "failed to read feed body");
            return Vec::new();
        }
    };

    parse_feed(&body, source, max_items)
}

/// Crawls every configured source concurrently and returns the ranked
/// top-N article list.
///
/// Each source is isolated: all outcomes are collected, never
/// short-circuited. The crawl is total; a run where every source fails
/// still returns successfully, with an empty list.
pub async fn crawl_news(client: &Client, config: &Config) -> Vec<Article> {
    info!(sources = config.sources.len(), "starting news crawl");

    let fetches = config
        .sources
        .iter()
        .map(|source| fetch_source(client, source, config.crawl.max_items_per_feed));
    let results = join_all(fetches).await;

    let mut all_articles = Vec::new();
    for (source, articles) in config.sources.iter().zip(results) {
        info!(source = %source.name, count = articles.len(), "source crawled");
        all_articles.extend(articles);
    }

    let ranked = dedupe_and_rank(all_articles, config.crawl.top_n);
    info!(total = ranked.len(), "crawl complete");
    ranked
}

/// Collapses duplicate URLs (last write wins), sorts newest-first with
/// undated articles ranking last, and truncates to `top_n`.
pub fn dedupe_and_rank(articles: Vec<Article>, top_n: usize) -> Vec<Article> {
    let mut by_url: HashMap<String, Article> = HashMap::new();
    for article in articles {
        by_url.insert(article.url.clone(), article);
    }

    let mut unique: Vec<Article> = by_url.into_values().collect();
    unique.sort_by_key(|article| std::cmp::Reverse(sort_key(article)));
    unique.truncate(top_n);
    unique
}

fn sort_key(article: &Article) -> DateTime<Utc> {
    article.published_date.unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
