use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use dataforseo_client::{Device, OrganicResult};

/// One pipeline run's input, built from a single form submission and
/// immutable afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pub keyword: String,
    pub language_name: Option<String>,
    pub location_name: Option<String>,
    pub device: Device,
    /// Requested result count. Normalized to the provider's depth steps
    /// by the SERP client, not here.
    pub limit: u32,
    pub tone: Option<String>,
    pub audience: Option<String>,
    pub notes: Option<String>,
}

/// Outcome of one competitor page extraction. A failed page produces a
/// failure-status excerpt with empty text, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtractionStatus {
    Ok,
    FetchFailed,
    ParseFailed,
}

impl ExtractionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ExtractionStatus::Ok => "extracted",
            ExtractionStatus::FetchFailed => "fetch failed",
            ExtractionStatus::ParseFailed => "no readable text",
        }
    }
}

/// Bounded plain-text extract from one competitor page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Excerpt {
    pub url: String,
    pub title: String,
    pub text: String,
    pub status: ExtractionStatus,
}

impl Excerpt {
    pub fn is_ok(&self) -> bool {
        self.status == ExtractionStatus::Ok
    }
}

/// The generated brief, the only artifact the user persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brief {
    pub keyword: String,
    pub markdown: String,
    pub generated_at: DateTime<Utc>,
}

impl Brief {
    /// Download filename, derived from the keyword.
    pub fn filename(&self) -> String {
        let slug: String = self
            .keyword
            .trim()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        format!("seo_brief_{slug}.md")
    }
}

/// Everything one completed run produced, for rendering.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub brief: Brief,
    pub results: Vec<OrganicResult>,
    pub excerpts: Vec<Excerpt>,
}
