use std::sync::Arc;

use tracing::{info, warn};

use crate::compose::compose_brief;
use crate::config::RunOptions;
use crate::error::BriefError;
use crate::excerpt::extract_all;
use crate::traits::{BriefGenerator, PageFetcher, SerpProvider};
use crate::types::{QueryParams, RunOutcome};

/// Pipeline phases. Linear: Idle → FetchingSerp → ExtractingPages →
/// Composing → Done, with Error reachable from FetchingSerp and Composing.
/// ExtractingPages never errors; per-page failures are absorbed into
/// excerpt statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    FetchingSerp,
    ExtractingPages,
    Composing,
    Done,
    Error,
}

impl RunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunPhase::Idle => "idle",
            RunPhase::FetchingSerp => "fetching_serp",
            RunPhase::ExtractingPages => "extracting_pages",
            RunPhase::Composing => "composing",
            RunPhase::Done => "done",
            RunPhase::Error => "error",
        }
    }
}

fn enter(phase: RunPhase) {
    info!(phase = phase.as_str(), "Pipeline phase");
}

/// Run the whole pipeline for one form submission. Each run owns its
/// params, excerpts and brief; nothing is shared across runs.
pub async fn run(
    serp: &dyn SerpProvider,
    fetcher: Arc<dyn PageFetcher>,
    generator: &dyn BriefGenerator,
    params: &QueryParams,
    options: &RunOptions,
) -> Result<RunOutcome, BriefError> {
    enter(RunPhase::Idle);

    enter(RunPhase::FetchingSerp);
    let results = match serp.search(params).await {
        Ok(results) => results,
        Err(e) => {
            enter(RunPhase::Error);
            return Err(e.into());
        }
    };

    enter(RunPhase::ExtractingPages);
    let excerpts = extract_all(fetcher, &results, options.max_competitor_pages).await;

    // The composer only ever sees successful excerpts; failed pages are
    // visible to the user through the per-excerpt status.
    let usable: Vec<_> = excerpts.iter().filter(|e| e.is_ok()).cloned().collect();
    if usable.is_empty() && !options.allow_snippet_only_brief {
        warn!("No usable competitor content and snippet-only briefs disabled");
        enter(RunPhase::Error);
        return Err(BriefError::NoUsableContent);
    }

    enter(RunPhase::Composing);
    let brief = match compose_brief(generator, params, &results, &usable).await {
        Ok(brief) => brief,
        Err(e) => {
            enter(RunPhase::Error);
            return Err(e.into());
        }
    };

    enter(RunPhase::Done);
    Ok(RunOutcome {
        brief,
        results,
        excerpts,
    })
}
