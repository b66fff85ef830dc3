//! Best-effort enrichment: translation, summarization and genre
//! classification with uniform failure fallbacks.
//!
//! Every operation here is total. A broken, slow or unreachable backend
//! degrades to the original text (or the default genre) and a log line;
//! callers never see an error.

use std::sync::Arc;
use tracing::warn;

use super::{lang_name, GenerateRequest, GenerativeModel};

/// Closed set of genre labels the classifier may return.
pub const GENRES: [&str; 9] = [
    "competition",
    "achievement",
    "athlete",
    "gear",
    "technique",
    "facility",
    "accident",
    "event",
    "general",
];

/// Fallback genre when classification fails or returns an unknown label.
pub const DEFAULT_GENRE: &str = "general";

/// Maximum article content sent to the summarizer.
const SUMMARIZE_INPUT_CHARS: usize = 3000;

/// Length of the extractive fallback when summarization fails.
const SUMMARY_FALLBACK_CHARS: usize = 200;

/// Wraps a [`GenerativeModel`] with the pipeline's three enrichment
/// operations.
pub struct Enricher {
    model: Arc<dyn GenerativeModel>,
}

impl Enricher {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    /// Translates `text` between two language codes.
    ///
    /// Identity when the codes match or the text is empty; no request is
    /// issued in that case. Remote failures fall back to the untranslated
    /// input.
    pub async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> String {
        if text.is_empty() || source_lang == target_lang {
            return text.to_string();
        }

        let prompt = format!(
            "You are a professional climbing news translator with 30+ years of experience.\n\
             \n\
             Translate this climbing/bouldering news text from {source} to {target}.\n\
             \n\
             IMPORTANT RULES:\n\
             1. Keep climbing grades unchanged (V10, 5.14a, 8c, 9a, etc.)\n\
             2. Preserve proper nouns (climber names, crag names, competition names)\n\
             3. Use natural, fluent language for the target audience\n\
             4. Maintain the original tone and excitement\n\
             5. Do NOT add any explanation, prefix, or commentary\n\
             6. Do NOT add leading/trailing whitespace or newlines\n\
             7. Output ONLY the translated text itself\n\
             \n\
             Text to translate:\n\
             {text}",
            source = lang_name(source_lang),
            target = lang_name(target_lang),
        );

        let request = GenerateRequest {
            prompt,
            temperature: 0.2,
            max_output_tokens: 2048,
        };

        match self.model.generate(request).await {
            Ok(response) => response.text,
            Err(e) => {
                warn!(%source_lang, %target_lang, error = %e, "translation failed, keeping original text");
                text.to_string()
            }
        }
    }

    /// Summarizes article content in `target_lang`.
    ///
    /// Empty input yields empty output. Failures fall back to the first 200
    /// characters of the original content, never an empty string.
    pub async fn summarize(&self, content: &str, target_lang: &str) -> String {
        if content.is_empty() {
            return String::new();
        }

        let clipped: String = content.chars().take(SUMMARIZE_INPUT_CHARS).collect();
        let prompt = format!(
            "You are a professional climbing journalist with 30+ years of experience.\n\
             \n\
             Summarize this climbing news article in {target}.\n\
             \n\
             REQUIREMENTS:\n\
             1. Write 4-6 detailed sentences (approximately 300-500 characters)\n\
             2. Include specific details: WHO, WHAT, WHERE, WHEN, and WHY it matters\n\
             3. Preserve all climbing grades (V10, 5.14a, 8c, 9a, etc.) exactly as written\n\
             4. Use enthusiastic, professional tone that captures climbing culture\n\
             5. Include technical details and context that climbers care about\n\
             6. Do NOT add any prefix, commentary, or explanation\n\
             7. Do NOT add leading/trailing whitespace or blank lines\n\
             8. Output ONLY the summary itself\n\
             \n\
             Article content:\n\
             {clipped}\n\
             \n\
             Write the detailed summary now:",
            target = lang_name(target_lang),
        );

        let request = GenerateRequest {
            prompt,
            temperature: 0.3,
            max_output_tokens: 1024,
        };

        match self.model.generate(request).await {
            Ok(response) => response.text,
            Err(e) => {
                warn!(%target_lang, error = %e, "summarization failed, falling back to content prefix");
                content.chars().take(SUMMARY_FALLBACK_CHARS).collect()
            }
        }
    }

    /// Classifies an article into one of the fixed [`GENRES`].
    ///
    /// Anything unexpected from the backend, whether a failure or a label
    /// outside the closed set, maps to [`DEFAULT_GENRE`].
    pub async fn classify_genre(&self, title: &str, summary: &str) -> String {
        let prompt = format!(
            "Classify this climbing news into exactly ONE of these genres:\n\
             - competition (contests, IFSC, World Cup, Olympics)\n\
             - achievement (first ascents, records, sends)\n\
             - athlete (pro climber profiles, interviews)\n\
             - gear (equipment, shoes, reviews)\n\
             - technique (training, tips, how-to)\n\
             - facility (gyms, new routes, crags)\n\
             - accident (safety, incidents, rescue)\n\
             - event (festivals, meetups, community)\n\
             - general (other news)\n\
             \n\
             Title: {title}\n\
             Summary: {summary}\n\
             \n\
             Output ONLY the genre name in lowercase.",
        );

        let request = GenerateRequest {
            prompt,
            temperature: 0.1,
            max_output_tokens: 20,
        };

        let label = match self.model.generate(request).await {
            Ok(response) => response.text.trim().to_lowercase(),
            Err(e) => {
                warn!(error = %e, "genre classification failed, using default");
                return DEFAULT_GENRE.to_string();
            }
        };

        if GENRES.contains(&label.as_str()) {
            label
        } else {
            warn!(%label, "classifier returned an unknown genre label, using default");
            DEFAULT_GENRE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::GenerateResponse;
    use anyhow::Result;

    /// Backend stub that always answers with a fixed string.
    struct Fixed(&'static str);

    #[async_trait::async_trait]
    impl GenerativeModel for Fixed {
        async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse> {
            Ok(GenerateResponse {
                text: self.0.to_string(),
            })
        }
    }

    /// Backend stub that always fails; panics if used where no call is
    /// expected to go out.
    struct Failing;

    #[async_trait::async_trait]
    impl GenerativeModel for Failing {
        async fn generate(&self, _request: GenerateRequest) -> Result<GenerateResponse> {
            anyhow::bail!("backend unavailable")
        }
    }

    fn enricher(model: impl GenerativeModel + 'static) -> Enricher {
        Enricher::new(Arc::new(model))
    }

    #[tokio::test]
    async fn translate_same_language_is_identity() {
        // Failing backend proves no request is issued on the identity path.
        let enricher = enricher(Failing);
        assert_eq!(enricher.translate("V10 sent", "en", "en").await, "V10 sent");
        assert_eq!(enricher.translate("", "en", "ja").await, "");
    }

    #[tokio::test]
    async fn translate_failure_returns_original() {
        let enricher = enricher(Failing);
        assert_eq!(enricher.translate("V10 sent", "en", "ja").await, "V10 sent");
    }

    #[tokio::test]
    async fn translate_uses_backend_text() {
        let enricher = enricher(Fixed("V10完登"));
        assert_eq!(enricher.translate("V10 sent", "en", "ja").await, "V10完登");
    }

    #[tokio::test]
    async fn summarize_empty_is_empty() {
        let enricher = enricher(Failing);
        assert_eq!(enricher.summarize("", "ja").await, "");
    }

    #[tokio::test]
    async fn summarize_failure_falls_back_to_prefix() {
        let content = "a".repeat(350);
        let enricher = enricher(Failing);
        let summary = enricher.summarize(&content, "en").await;
        assert_eq!(summary, "a".repeat(200));
    }

    #[tokio::test]
    async fn classify_accepts_known_label() {
        let enricher = enricher(Fixed("competition"));
        assert_eq!(enricher.classify_genre("IFSC World Cup", "").await, "competition");
    }

    #[tokio::test]
    async fn classify_rejects_unknown_label() {
        let enricher = enricher(Fixed("unknown-genre"));
        assert_eq!(enricher.classify_genre("t", "s").await, "general");
    }

    #[tokio::test]
    async fn classify_failure_uses_default() {
        let enricher = enricher(Failing);
        assert_eq!(enricher.classify_genre("t", "s").await, "general");
    }
}
