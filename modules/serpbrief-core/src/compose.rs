use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use openai_client::{ChatMessage, ChatRequest, GenerationError, OpenAiClient};

use crate::traits::BriefGenerator;
use crate::types::{Brief, Excerpt, OrganicResult, QueryParams};

pub const GENERATION_MODEL: &str = "gpt-4.1-mini";
pub const GENERATION_TEMPERATURE: f64 = 0.6;

pub const SYSTEM_PROMPT: &str =
    "You are a senior SEO consultant who writes complete, strategic content outlines.";

pub struct OpenAiBriefGenerator {
    client: OpenAiClient,
}

impl OpenAiBriefGenerator {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: OpenAiClient::new(api_key),
        }
    }
}

#[async_trait]
impl BriefGenerator for OpenAiBriefGenerator {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: GENERATION_MODEL.to_string(),
            messages: vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(user_prompt),
            ],
            temperature: Some(GENERATION_TEMPERATURE),
        };
        self.client.chat(&request).await
    }
}

/// Assemble the single generation prompt: query and locale, the rank-ordered
/// SERP overview, and the competitor excerpts labeled by source URL.
pub fn build_user_prompt(
    params: &QueryParams,
    results: &[OrganicResult],
    excerpts: &[Excerpt],
) -> String {
    let serp_table = results
        .iter()
        .map(|r| {
            format!(
                "{}. {} — {}\n   Snippet: {}",
                r.position,
                r.title,
                r.url,
                if r.snippet.is_empty() { "N/A" } else { &r.snippet }
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let competitor_section = if excerpts.is_empty() {
        "No competitor page content is available. Work from the SERP titles and snippets above."
            .to_string()
    } else {
        excerpts
            .iter()
            .map(|e| format!("- **{}** ({})\n  Excerpt: {}", e.title, e.url, e.text))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let or = |v: &Option<String>, fallback: &str| -> String {
        v.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(fallback)
            .to_string()
    };

    format!(
        r#"Define a piece of content that can rank for the query: "{query}".

Available data:
- Target location: {location}
- Target language: {language}
- Target audience: {audience}
- Requested tone of voice: {tone}
- Additional notes: {notes}

Current SERP overview:
{serp_table}

Competitor insights:
{competitor_section}

Produce a complete content proposal that includes:
1. Main goal of the content and KPIs.
2. Search-intent analysis with related micro-intents.
3. Detailed structure (H1, H2, H3) with a description for each section.
4. Key paragraphs and points to cover.
5. Keyword list with long-tail variants, each tagged with its intent.
6. Suggested frequently asked questions (FAQ).
7. Suggestions for media elements and calls to action.
8. Schema markup and on-page optimization notes.

Respond in well-structured Markdown."#,
        query = params.keyword,
        location = or(&params.location_name, "not specified"),
        language = or(&params.language_name, "not specified"),
        audience = or(&params.audience, "not specified"),
        tone = or(&params.tone, "neutral"),
        notes = or(&params.notes, "none"),
    )
}

/// Run one generation request and wrap the verbatim response as the Brief.
pub async fn compose_brief(
    generator: &dyn BriefGenerator,
    params: &QueryParams,
    results: &[OrganicResult],
    excerpts: &[Excerpt],
) -> Result<Brief, GenerationError> {
    let user_prompt = build_user_prompt(params, results, excerpts);
    let markdown = generator.generate(SYSTEM_PROMPT, &user_prompt).await?;

    info!(
        chars = markdown.len(),
        excerpts = excerpts.len(),
        "Brief generated"
    );

    Ok(Brief {
        keyword: params.keyword.clone(),
        markdown,
        generated_at: Utc::now(),
    })
}
