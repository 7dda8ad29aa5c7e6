//! Pipeline contract tests with deterministic stub providers.
//!
//! Each test wires stub impls of the three seams (SERP, page fetch,
//! generation) into pipeline::run() and asserts the run-level behavior:
//! error short-circuits, per-page failure isolation, excerpt counting,
//! zero-excerpt policy, idempotence. No network, no real providers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use dataforseo_client::SerpError;
use openai_client::GenerationError;
use serpbrief_core::traits::{BriefGenerator, PageFetcher, SerpProvider};
use serpbrief_core::{
    pipeline, BriefError, Device, ExtractionStatus, OrganicResult, QueryParams, RunOptions,
};

// ---------------------------------------------------------------------------
// Stubs
// ---------------------------------------------------------------------------

struct StubSerp {
    outcome: std::result::Result<Vec<OrganicResult>, ()>,
    task_error: Option<(u32, String)>,
}

impl StubSerp {
    fn with_results(count: u32) -> Self {
        let results = (1..=count)
            .map(|position| OrganicResult {
                position,
                title: format!("Competitor {position}"),
                url: format!("https://competitor-{position}.example/page"),
                snippet: format!("Snippet for competitor {position}"),
            })
            .collect();
        Self {
            outcome: Ok(results),
            task_error: None,
        }
    }

    fn failing_task(code: u32, message: &str) -> Self {
        Self {
            outcome: Err(()),
            task_error: Some((code, message.to_string())),
        }
    }
}

#[async_trait]
impl SerpProvider for StubSerp {
    async fn search(
        &self,
        _params: &QueryParams,
    ) -> std::result::Result<Vec<OrganicResult>, SerpError> {
        match (&self.outcome, &self.task_error) {
            (Ok(results), _) => Ok(results.clone()),
            (Err(()), Some((code, message))) => Err(SerpError::Task {
                code: *code,
                message: message.clone(),
            }),
            (Err(()), None) => Err(SerpError::Empty),
        }
    }
}

/// Serves a readable article for every URL except those whose position
/// appears in `failing`, which error out at fetch time.
struct StubFetcher {
    failing: Vec<u32>,
    contentless: Vec<u32>,
    calls: AtomicUsize,
}

impl StubFetcher {
    fn new(failing: Vec<u32>) -> Self {
        Self {
            failing,
            contentless: vec![],
            calls: AtomicUsize::new(0),
        }
    }

    /// Pages that fetch fine but carry no readable text.
    fn contentless(positions: Vec<u32>) -> Self {
        Self {
            failing: vec![],
            contentless: positions,
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.iter().any(|p| url.contains(&format!("-{p}."))) {
            anyhow::bail!("connection refused");
        }
        if self
            .contentless
            .iter()
            .any(|p| url.contains(&format!("-{p}.")))
        {
            return Ok(
                "<html><head><script>window.render();</script></head><body></body></html>"
                    .to_string(),
            );
        }
        Ok(format!(
            "<html><head><title>Guide</title></head><body><article><h1>Guide</h1>\
             <p>This page ({url}) compares products across durability, comfort and price, \
             walking through what matters for each buyer profile in enough detail that a \
             first-time buyer can make a confident decision without further research.</p>\
             <p>It continues with a section on common mistakes, a breakdown of materials \
             and construction methods, and side-by-side scores from two seasons of field \
             testing across a wide range of conditions and terrain types.</p>\
             <p>It closes with sizing advice, care instructions and a buying checklist \
             assembled from several seasons of reader feedback and expert interviews.</p>\
             </article></body></html>"
        ))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Deterministic generator: output depends only on the prompt.
struct StubGenerator {
    calls: AtomicUsize,
    fail: bool,
}

impl StubGenerator {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BriefGenerator for StubGenerator {
    async fn generate(
        &self,
        _system_prompt: &str,
        user_prompt: &str,
    ) -> std::result::Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GenerationError::Api {
                status: 429,
                message: "quota exceeded".to_string(),
            });
        }
        Ok(format!(
            "# Content brief\n\n## Outline\n\n- Section\n\nprompt_chars: {}",
            user_prompt.chars().count()
        ))
    }
}

fn params() -> QueryParams {
    QueryParams {
        keyword: "best hiking boots".to_string(),
        language_name: Some("English".to_string()),
        location_name: Some("United States".to_string()),
        device: Device::Desktop,
        limit: 10,
        tone: None,
        audience: None,
        notes: None,
    }
}

fn options(max_pages: usize) -> RunOptions {
    RunOptions {
        allow_snippet_only_brief: true,
        max_competitor_pages: max_pages,
    }
}

// ---------------------------------------------------------------------------
// Error short-circuits
// ---------------------------------------------------------------------------

#[tokio::test]
async fn task_error_ends_run_before_any_fetch() {
    let serp = StubSerp::failing_task(40503, "POST Data Is Invalid");
    let fetcher = Arc::new(StubFetcher::new(vec![]));
    let generator = StubGenerator::new();

    let outcome = pipeline::run(
        &serp,
        fetcher.clone(),
        &generator,
        &params(),
        &options(5),
    )
    .await;

    match outcome {
        Err(BriefError::Serp(SerpError::Task { code, .. })) => assert_eq!(code, 40503),
        other => panic!("expected Task error, got {other:?}"),
    }
    assert_eq!(fetcher.call_count(), 0, "no page fetch after a failed task");
    assert_eq!(generator.call_count(), 0);
}

#[tokio::test]
async fn generation_failure_surfaces_verbatim() {
    let serp = StubSerp::with_results(3);
    let fetcher = Arc::new(StubFetcher::new(vec![]));
    let generator = StubGenerator::failing();

    let outcome = pipeline::run(&serp, fetcher, &generator, &params(), &options(3)).await;

    match outcome {
        Err(BriefError::Generation(GenerationError::Api { status, message })) => {
            assert_eq!(status, 429);
            assert!(message.contains("quota"));
        }
        other => panic!("expected Generation error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Per-page failure isolation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_fetches_absorbed_and_run_completes() {
    let serp = StubSerp::with_results(10);
    let fetcher = Arc::new(StubFetcher::new(vec![2, 5, 8]));
    let generator = StubGenerator::new();

    let outcome = pipeline::run(
        &serp,
        fetcher.clone(),
        &generator,
        &params(),
        &options(10),
    )
    .await
    .expect("run should complete despite page failures");

    assert_eq!(outcome.excerpts.len(), 10);
    let extracted: Vec<_> = outcome.excerpts.iter().filter(|e| e.is_ok()).collect();
    assert_eq!(extracted.len(), 7);
    for excerpt in &outcome.excerpts {
        if !excerpt.is_ok() {
            assert_eq!(excerpt.status, ExtractionStatus::FetchFailed);
            assert!(excerpt.text.is_empty());
        }
    }
    assert_eq!(fetcher.call_count(), 10);
    assert!(!outcome.brief.markdown.is_empty());
    assert!(outcome.brief.markdown.starts_with("# "));
}

#[tokio::test]
async fn contentless_pages_marked_parse_failed() {
    let serp = StubSerp::with_results(3);
    let fetcher = Arc::new(StubFetcher::contentless(vec![2]));
    let generator = StubGenerator::new();

    let outcome = pipeline::run(&serp, fetcher, &generator, &params(), &options(3))
        .await
        .expect("script-only pages never abort the run");

    assert_eq!(outcome.excerpts.len(), 3);
    let second = &outcome.excerpts[1];
    assert_eq!(second.status, ExtractionStatus::ParseFailed);
    assert!(second.text.is_empty());
    assert!(outcome.excerpts[0].is_ok());
    assert!(outcome.excerpts[2].is_ok());
}

#[tokio::test]
async fn excerpts_come_back_in_rank_order() {
    let serp = StubSerp::with_results(6);
    let fetcher = Arc::new(StubFetcher::new(vec![3]));
    let generator = StubGenerator::new();

    let outcome = pipeline::run(&serp, fetcher, &generator, &params(), &options(6))
        .await
        .unwrap();

    let urls: Vec<_> = outcome.excerpts.iter().map(|e| e.url.as_str()).collect();
    for (i, url) in urls.iter().enumerate() {
        assert!(
            url.contains(&format!("-{}.", i + 1)),
            "excerpt {i} out of rank order: {url}"
        );
    }
}

#[tokio::test]
async fn max_competitor_pages_caps_fetches() {
    let serp = StubSerp::with_results(10);
    let fetcher = Arc::new(StubFetcher::new(vec![]));
    let generator = StubGenerator::new();

    let outcome = pipeline::run(
        &serp,
        fetcher.clone(),
        &generator,
        &params(),
        &options(5),
    )
    .await
    .unwrap();

    assert_eq!(fetcher.call_count(), 5);
    assert_eq!(outcome.excerpts.len(), 5);
    assert_eq!(outcome.results.len(), 10, "SERP overview keeps all results");
}

// ---------------------------------------------------------------------------
// Zero-excerpt policy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn all_fetches_failed_with_snippet_only_allowed_still_generates() {
    let serp = StubSerp::with_results(4);
    let fetcher = Arc::new(StubFetcher::new(vec![1, 2, 3, 4]));
    let generator = StubGenerator::new();

    let outcome = pipeline::run(&serp, fetcher, &generator, &params(), &options(4))
        .await
        .expect("snippet-only briefs are allowed by default");

    assert_eq!(generator.call_count(), 1);
    assert!(outcome.excerpts.iter().all(|e| !e.is_ok()));
}

#[tokio::test]
async fn all_fetches_failed_with_snippet_only_disabled_halts() {
    let serp = StubSerp::with_results(4);
    let fetcher = Arc::new(StubFetcher::new(vec![1, 2, 3, 4]));
    let generator = StubGenerator::new();
    let opts = RunOptions {
        allow_snippet_only_brief: false,
        max_competitor_pages: 4,
    };

    let outcome = pipeline::run(&serp, fetcher, &generator, &params(), &opts).await;

    assert!(matches!(outcome, Err(BriefError::NoUsableContent)));
    assert_eq!(generator.call_count(), 0, "generation provider never called");
}

// ---------------------------------------------------------------------------
// Idempotence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn identical_runs_produce_identical_briefs() {
    let serp = StubSerp::with_results(5);
    let generator = StubGenerator::new();

    let first = pipeline::run(
        &serp,
        Arc::new(StubFetcher::new(vec![2])),
        &generator,
        &params(),
        &options(5),
    )
    .await
    .unwrap();
    let second = pipeline::run(
        &serp,
        Arc::new(StubFetcher::new(vec![2])),
        &generator,
        &params(),
        &options(5),
    )
    .await
    .unwrap();

    assert_eq!(first.brief.markdown, second.brief.markdown);
    assert_eq!(first.brief.keyword, second.brief.keyword);
    assert_eq!(first.excerpts, second.excerpts);
}
