//! RSS document parsing: splits a raw feed into `<item>` fragments and
//! builds one normalized [`Article`] per fragment.

use chrono::{DateTime, Utc};
use common::{Article, SourceConfig};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::extract::{extract_field, first_image_url};

/// Hard cap on the summary length stored on an Article.
pub const MAX_SUMMARY_CHARS: usize = 500;

static ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<item[^>]*>(.*?)</item>").unwrap());

/// Parses a raw RSS document into Articles, in document order, capped at
/// `max_items`.
///
/// Fragments missing a title or a link are dropped; every other field
/// degrades to its fallback independently. The document as a whole never
/// fails: zero matching items yields an empty list.
pub fn parse_feed(xml: &str, source: &SourceConfig, max_items: usize) -> Vec<Article> {
    let mut articles = Vec::new();

    for caps in ITEM_RE.captures_iter(xml) {
        if articles.len() >= max_items {
            break;
        }
        let item = &caps[1];

        let title = extract_field(item, "title");
        let link = extract_field(item, "link");
        if title.is_empty() || link.is_empty() {
            debug!(source = %source.name, "skipping item without title or link");
            continue;
        }

        let description = extract_field(item, "description");
        let pub_date = extract_field(item, "pubDate");

        articles.push(Article {
            title,
            summary: truncate_chars(&description, MAX_SUMMARY_CHARS),
            url: link,
            source_name: source.name.clone(),
            source_url: None,
            image_url: first_image_url(item),
            published_date: Some(parse_pub_date(&pub_date)),
            category: None,
            genre: None,
            language: source.lang.clone(),
        });
    }

    articles
}

/// RSS pubDate is RFC 2822 on paper, but real feeds also emit RFC 3339.
/// Anything missing or unparseable falls back to the current time.
fn parse_pub_date(raw: &str) -> DateTime<Utc> {
    if raw.is_empty() {
        return Utc::now();
    }
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|date| date.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Character-based truncation, safe on multi-byte text.
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
