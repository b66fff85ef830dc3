//! Per-article localization: fans the translator out across the four
//! supported languages for title and summary.

use common::{Article, LocalizedText};
use futures::future::join_all;
use serde::Serialize;

use crate::llm::enrich::Enricher;
use crate::llm::TARGET_LANGS;

/// Localized title and summary for one article.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArticleLocalization {
    pub title: LocalizedText,
    pub summary: LocalizedText,
}

/// Produces title and summary translations for every supported language.
///
/// The source-language entry passes through untranslated. The title batch
/// and the summary batch run one after the other to keep request bursts
/// small; within each batch the four languages are translated concurrently
/// and assembled by language code, not completion order.
pub async fn localize_article(enricher: &Enricher, article: &Article) -> ArticleLocalization {
    ArticleLocalization {
        title: localize_field(enricher, &article.title, &article.language).await,
        summary: localize_field(enricher, &article.summary, &article.language).await,
    }
}

async fn localize_field(enricher: &Enricher, text: &str, source_lang: &str) -> LocalizedText {
    let translations = join_all(TARGET_LANGS.iter().map(|target| async move {
        if *target == source_lang {
            (*target, text.to_string())
        } else {
            (*target, enricher.translate(text, source_lang, target).await)
        }
    }))
    .await;

    let mut localized = LocalizedText::default();
    for (lang, value) in translations {
        localized.set(lang, value);
    }
    localized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{GenerateRequest, GenerateResponse, GenerativeModel};
    use anyhow::Result;
    use std::sync::Arc;

    /// Echoes the target language back so tests can see which translation
    /// produced each entry.
    struct TargetEcho;

    #[async_trait::async_trait]
    impl GenerativeModel for TargetEcho {
        async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
            // The translation prompt names the target language on its
            // third line ("... from English to Japanese.").
            let target = request
                .prompt
                .lines()
                .find(|line| line.starts_with("Translate"))
                .and_then(|line| line.rsplit(' ').next())
                .unwrap_or("?")
                .trim_end_matches('.')
                .to_string();
            Ok(GenerateResponse {
                text: format!("[{target}]"),
            })
        }
    }

    fn article(title: &str, summary: &str, language: &str) -> Article {
        Article {
            title: title.to_string(),
            summary: summary.to_string(),
            url: "https://x/1".to_string(),
            source_name: "Test".to_string(),
            source_url: None,
            image_url: None,
            published_date: None,
            category: None,
            genre: None,
            language: language.to_string(),
        }
    }

    #[tokio::test]
    async fn source_language_passes_through() {
        let enricher = Enricher::new(Arc::new(TargetEcho));
        let article = article("V10 sent", "Big news from the boulders", "en");

        let localized = localize_article(&enricher, &article).await;

        assert_eq!(localized.title.en, "V10 sent");
        assert_eq!(localized.title.ja, "[Japanese]");
        assert_eq!(localized.title.zh, "[Chinese]");
        assert_eq!(localized.title.ko, "[Korean]");
        assert_eq!(localized.summary.en, "Big news from the boulders");
        assert_eq!(localized.summary.ja, "[Japanese]");
    }

    #[tokio::test]
    async fn empty_summary_stays_empty_everywhere() {
        let enricher = Enricher::new(Arc::new(TargetEcho));
        let article = article("V10 sent", "", "ja");

        let localized = localize_article(&enricher, &article).await;

        assert_eq!(localized.title.ja, "V10 sent");
        for code in ["en", "zh", "ko"] {
            assert_eq!(localized.summary.get(code), Some(""));
        }
    }
}
