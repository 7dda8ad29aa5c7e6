/// Provider credentials for one session. Built from the submitted form,
/// passed down explicitly, dropped with the request. Never logged, never
/// persisted, never read from process-wide state.
#[derive(Clone)]
pub struct SessionConfig {
    pub dataforseo_login: String,
    pub dataforseo_password: String,
    pub openai_api_key: String,
}

impl std::fmt::Debug for SessionConfig {
    // Credentials stay out of logs and error chains.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig").finish_non_exhaustive()
    }
}

/// Per-run policy knobs.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// When no competitor page yields text, still generate a brief from
    /// the SERP titles and snippets alone. When false the run fails
    /// before any generation request.
    pub allow_snippet_only_brief: bool,
    /// How many top-ranked results get a page fetch.
    pub max_competitor_pages: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            allow_snippet_only_brief: true,
            max_competitor_pages: 5,
        }
    }
}
