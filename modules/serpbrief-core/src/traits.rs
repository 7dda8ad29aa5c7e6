use anyhow::Result;
use async_trait::async_trait;

use dataforseo_client::{DataForSeoClient, OrganicResult, SerpError};
use openai_client::GenerationError;

use crate::types::QueryParams;

/// SERP lookup seam. The live impl wraps the DataForSEO client; tests
/// substitute canned result lists.
#[async_trait]
pub trait SerpProvider: Send + Sync {
    async fn search(
        &self,
        params: &QueryParams,
    ) -> std::result::Result<Vec<OrganicResult>, SerpError>;
}

/// One outbound page fetch. Implementations return the raw HTML body;
/// extraction happens in the caller.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
    fn name(&self) -> &str;
}

/// Generation seam: one prompt in, Markdown text out.
#[async_trait]
pub trait BriefGenerator: Send + Sync {
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> std::result::Result<String, GenerationError>;
}

pub struct LiveSerpProvider {
    client: DataForSeoClient,
}

impl LiveSerpProvider {
    pub fn new(login: String, password: String) -> Self {
        Self {
            client: DataForSeoClient::new(login, password),
        }
    }
}

#[async_trait]
impl SerpProvider for LiveSerpProvider {
    async fn search(
        &self,
        params: &QueryParams,
    ) -> std::result::Result<Vec<OrganicResult>, SerpError> {
        self.client
            .live_organic_search(
                &params.keyword,
                params.language_name.as_deref(),
                params.location_name.as_deref(),
                params.device,
                params.limit,
            )
            .await
    }
}
