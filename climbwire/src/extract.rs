//! Regex-based field extraction for RSS item fragments.
//!
//! RSS in the wild mixes CDATA, escaped HTML and namespaced tags freely, so
//! the extractor treats fragments as semi-structured text rather than strict
//! XML. Malformed input never errors; a field that cannot be matched is
//! simply empty.

use regex::Regex;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

static IMAGE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url="([^"]+\.(?:jpg|jpeg|png|webp)[^"]*)""#).unwrap()
});

/// Returns the decoded inner text of the first `<tag ...>...</tag>` match in
/// `fragment`, or an empty string when the tag is absent or unclosed.
///
/// Matching is case-insensitive and attributes on the opening tag are
/// ignored. Only the first occurrence is considered.
pub fn extract_field(fragment: &str, tag: &str) -> String {
    let pattern = format!(r"(?is)<{tag}[^>]*>(.*?)</{tag}>", tag = regex::escape(tag));
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(_) => return String::new(),
    };
    let Some(caps) = re.captures(fragment) else {
        return String::new();
    };
    let inner = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let inner = inner.replace("<![CDATA[", "").replace("]]>", "");
    let inner = TAG_RE.replace_all(&inner, "");
    decode_entities(&inner).trim().to_string()
}

/// First image reference in an item fragment: any
/// `url="...jpg|jpeg|png|webp..."` attribute, as carried by media:content,
/// media:thumbnail and enclosure tags.
pub fn first_image_url(fragment: &str) -> Option<String> {
    IMAGE_URL_RE
        .captures(fragment)
        .map(|caps| caps[1].to_string())
}

/// Decodes the five standard HTML entities. Anything else is left as-is;
/// this is deliberately not a full HTML entity decoder.
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}
