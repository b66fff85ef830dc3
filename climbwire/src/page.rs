//! Article-page image extraction.
//!
//! Feeds frequently omit media tags, so the crawl can backfill an Article's
//! `image_url` from the article page itself: Open Graph metadata first, then
//! Twitter card metadata, then the first sufficiently large inline image.

use anyhow::{Context, Result};
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

/// Inline `<img>` with a width or height attribute; captures the src URL and
/// the size value.
static SIZED_IMG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img[^>]+src="([^"]+)"[^>]*(?:width|height)=["']?(\d+)"#).unwrap()
});

/// Minimum width/height for an inline image to count as an article image.
const MIN_IMAGE_SIZE: u32 = 300;

/// Fetches `url` and returns the page's best candidate image, resolved
/// against the page URL so relative references come back absolute.
pub async fn extract_image_from_page(client: &Client, url: &str) -> Result<Option<String>> {
    let base = Url::parse(url).context("failed to parse article URL")?;

    let response = client
        .get(url)
        .send()
        .await
        .context("failed to fetch article page")?;
    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("article page fetch failed with status: {status}");
    }
    let html = response
        .text()
        .await
        .context("failed to read article page body")?;

    Ok(find_page_image(&html).and_then(|raw| resolve(&base, &raw)))
}

/// Pure scan over a page's HTML: og:image, then twitter:image, then the
/// first inline image at least 300px wide or tall.
pub fn find_page_image(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    for css in [r#"meta[property="og:image"]"#, r#"meta[name="twitter:image"]"#] {
        if let Ok(selector) = Selector::parse(css) {
            if let Some(content) = document
                .select(&selector)
                .find_map(|element| element.value().attr("content"))
                .filter(|content| !content.is_empty())
            {
                return Some(content.to_string());
            }
        }
    }

    for caps in SIZED_IMG_RE.captures_iter(html) {
        if let Ok(size) = caps[2].parse::<u32>() {
            if size >= MIN_IMAGE_SIZE {
                return Some(caps[1].to_string());
            }
        }
    }

    None
}

fn resolve(base: &Url, raw: &str) -> Option<String> {
    base.join(raw).ok().map(|resolved| resolved.to_string())
}
