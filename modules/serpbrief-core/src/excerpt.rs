use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use spider_transformations::transformation::content::{
    transform_content_input, ReturnFormat, TransformConfig, TransformInput,
};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::traits::PageFetcher;
use crate::types::{Excerpt, ExtractionStatus, OrganicResult};

/// Char budget per excerpt. Bounds the prompt size downstream.
pub const EXCERPT_MAX_CHARS: usize = 2000;

/// Max concurrent page fetches. An optimization, not a correctness
/// requirement; excerpts are re-ordered by rank afterward.
const MAX_CONCURRENT_FETCHES: usize = 4;

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

// --- Plain HTTP fetcher ---

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");
        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let parsed = url::Url::parse(url).context("Invalid URL")?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            anyhow::bail!("Only http/https URLs are allowed, got: {}", parsed.scheme());
        }

        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {} fetching {url}", status.as_u16());
        }
        Ok(resp.text().await?)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Strip markup down to readable text via the Readability transform.
/// Returns an empty string for pages with no extractable content.
pub fn extract_text(html: &str, url: &str) -> String {
    let parsed_url = url::Url::parse(url).ok();
    let config = TransformConfig {
        readability: true,
        main_content: true,
        return_format: ReturnFormat::Markdown,
        filter_images: true,
        filter_svg: true,
        clean_html: true,
    };
    let input = TransformInput {
        url: parsed_url.as_ref(),
        content: html.as_bytes(),
        screenshot_bytes: None,
        encoding: None,
        selector_config: None,
        ignore_tags: None,
    };

    transform_content_input(input, &config)
}

/// Truncate to at most `max_chars` characters, appending an ellipsis when
/// anything was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => {
            let mut out = text[..byte_idx].trim_end().to_string();
            out.push('…');
            out
        }
        None => text.to_string(),
    }
}

/// Fetch and extract one competitor page. Never returns Err: any fetch or
/// parse failure is absorbed into the excerpt's status.
pub async fn extract_excerpt(fetcher: &dyn PageFetcher, result: &OrganicResult) -> Excerpt {
    let html = match fetcher.fetch(&result.url).await {
        Ok(html) => html,
        Err(e) => {
            warn!(url = %result.url, error = %e, "Competitor page fetch failed");
            return Excerpt {
                url: result.url.clone(),
                title: result.title.clone(),
                text: String::new(),
                status: ExtractionStatus::FetchFailed,
            };
        }
    };

    let text = extract_text(&html, &result.url);
    if text.trim().is_empty() {
        warn!(url = %result.url, "No readable text after extraction");
        return Excerpt {
            url: result.url.clone(),
            title: result.title.clone(),
            text: String::new(),
            status: ExtractionStatus::ParseFailed,
        };
    }

    Excerpt {
        url: result.url.clone(),
        title: result.title.clone(),
        text: truncate_chars(text.trim(), EXCERPT_MAX_CHARS),
        status: ExtractionStatus::Ok,
    }
}

/// Fan out over the top-ranked results with bounded parallelism. The
/// returned excerpts are in rank order regardless of completion order.
pub async fn extract_all(
    fetcher: Arc<dyn PageFetcher>,
    results: &[OrganicResult],
    max_pages: usize,
) -> Vec<Excerpt> {
    let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_FETCHES));

    let tasks = results.iter().take(max_pages).cloned().map(|result| {
        let fetcher = Arc::clone(&fetcher);
        let semaphore = Arc::clone(&semaphore);
        async move {
            let _permit = semaphore.acquire().await.ok();
            extract_excerpt(fetcher.as_ref(), &result).await
        }
    });

    let excerpts = futures::future::join_all(tasks).await;

    let ok_count = excerpts.iter().filter(|e| e.is_ok()).count();
    info!(
        total = excerpts.len(),
        extracted = ok_count,
        "Competitor extraction finished"
    );
    excerpts
}
