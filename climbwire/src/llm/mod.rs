use anyhow::Result;

/// Core trait for generative text backends.
///
/// The pipeline only ever needs single-prompt completion; translation,
/// summarization and classification are prompt engineering on top of it,
/// implemented in [`enrich`].
#[async_trait::async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate a completion for a given prompt
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;
}

/// A single prompt plus generation parameters.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub prompt: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// The first candidate text returned by the backend, trimmed.
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    pub text: String,
}

/// Language codes supported by the enrichment pipeline.
pub const TARGET_LANGS: [&str; 4] = ["ja", "en", "zh", "ko"];

/// English display name used in prompts. Unknown codes pass through so the
/// model still receives something workable.
pub fn lang_name(code: &str) -> &str {
    match code {
        "ja" => "Japanese",
        "en" => "English",
        "zh" => "Chinese",
        "ko" => "Korean",
        other => other,
    }
}

pub mod enrich;
pub mod gemini;
