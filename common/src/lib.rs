/*!
common/src/lib.rs

Shared configuration types and the data model for ClimbWire.

This file provides:
- Config data structures (deserialized from TOML)
- An async loader with default-file + override-file merge
- The Article and LocalizedText records exchanged between the crawler,
  the enrichment pipeline and external consumers
*/

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One syndicated news endpoint with a fixed name and source language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub url: String,
    /// ISO language code of the feed's text ("en", "ja", ...). Fixed per
    /// source, never detected.
    pub lang: String,
}

/// Crawling / fetching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_seconds: u64,
    /// Per-feed cap on parsed items.
    #[serde(default = "default_max_items")]
    pub max_items_per_feed: usize,
    /// Size of the ranked list the crawl publishes.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            fetch_timeout_seconds: default_fetch_timeout(),
            max_items_per_feed: default_max_items(),
            top_n: default_top_n(),
        }
    }
}

fn default_user_agent() -> String {
    "ClimbWire News Bot/1.0".to_string()
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_max_items() -> usize {
    10
}

fn default_top_n() -> usize {
    20
}

/// Remote generative-AI configuration (used when `[enrichment]` is present).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Name of the environment variable holding the API key. The key itself
    /// never appears in config files or logs.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key_env: default_api_key_env(),
            model: default_model(),
            timeout_seconds: default_llm_timeout(),
        }
    }
}

fn default_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash-exp".to_string()
}

fn default_llm_timeout() -> u64 {
    30
}

/// Top-level application configuration (deserialized from config.toml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
    pub enrichment: Option<EnrichmentConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawl: CrawlConfig::default(),
            sources: default_sources(),
            enrichment: None,
        }
    }
}

/// The fixed list of worldwide climbing news sources used when no
/// `[[sources]]` section overrides it.
pub fn default_sources() -> Vec<SourceConfig> {
    let sources = [
        ("Rock and Ice", "https://rockandice.com/feed/", "en"),
        ("Climbing Magazine", "https://www.climbing.com/feed/", "en"),
        ("UKClimbing", "https://www.ukclimbing.com/news/rss.php", "en"),
        (
            "PlanetMountain",
            "https://www.planetmountain.com/rss.php?lang=eng",
            "en",
        ),
        (
            "IFSC News",
            "https://www.ifsc-climbing.org/index.php/component/obrss/ifsc-news?format=feed&type=rss",
            "en",
        ),
    ];
    sources
        .into_iter()
        .map(|(name, url, lang)| SourceConfig {
            name: name.to_string(),
            url: url.to_string(),
            lang: lang.to_string(),
        })
        .collect()
}

impl Config {
    /// Load configuration from a TOML file asynchronously.
    ///
    /// Example:
    ///   let cfg = Config::from_file("config.toml").await?;
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = tokio::fs::read_to_string(path.as_ref())
            .await
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let cfg: Config = toml::from_str(&data).context("Failed to parse TOML configuration")?;
        Ok(cfg)
    }

    /// Load configuration with an optional default file and an optional
    /// override file. If both are present they are merged, the override
    /// taking precedence. Missing files are skipped, so calling this with
    /// two absent paths yields the built-in defaults.
    pub async fn load_with_defaults(
        default_path: Option<&Path>,
        override_path: Option<&Path>,
    ) -> Result<Self> {
        let mut merged = toml::Value::Table(toml::map::Map::new());

        for path in [default_path, override_path].into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            let data = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let value: toml::Value = toml::from_str(&data)
                .with_context(|| format!("Failed to parse configuration: {}", path.display()))?;
            merge_toml(&mut merged, value);
        }

        let cfg: Config = merged
            .try_into()
            .context("Failed to parse merged configuration")?;
        Ok(cfg)
    }
}

fn merge_toml(a: &mut toml::Value, b: toml::Value) {
    match (a, b) {
        (toml::Value::Table(a_map), toml::Value::Table(b_map)) => {
            for (k, v) in b_map {
                if let Some(a_val) = a_map.get_mut(&k) {
                    merge_toml(a_val, v);
                } else {
                    a_map.insert(k, v);
                }
            }
        }
        (a_val, b_val) => *a_val = b_val,
    }
}

/// One normalized climbing-news item extracted from a feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    /// Plain-text summary, truncated to 500 characters at parse time.
    pub summary: String,
    /// Canonical link. Doubles as the deduplication key across sources.
    pub url: String,
    /// Human-readable origin label from the source configuration.
    pub source_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Publication timestamp. `None` ranks last in sorted output.
    pub published_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Classification label, populated by enrichment rather than parsing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// ISO code of the source text, fixed per feed.
    pub language: String,
}

/// Per-language-code mapping of translated text for one Article field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub ja: String,
    pub en: String,
    pub zh: String,
    pub ko: String,
}

impl LocalizedText {
    /// Stores `value` under a language code. Codes outside the supported set
    /// are ignored.
    pub fn set(&mut self, code: &str, value: String) {
        match code {
            "ja" => self.ja = value,
            "en" => self.en = value,
            "zh" => self.zh = value,
            "ko" => self.ko = value,
            _ => {}
        }
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        match code {
            "ja" => Some(&self.ja),
            "en" => Some(&self.en),
            "zh" => Some(&self.zh),
            "ko" => Some(&self.ko),
            _ => None,
        }
    }
}
