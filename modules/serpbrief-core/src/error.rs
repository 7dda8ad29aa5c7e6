use thiserror::Error;

#[derive(Debug, Error)]
pub enum BriefError {
    #[error(transparent)]
    Serp(#[from] dataforseo_client::SerpError),

    #[error(transparent)]
    Generation(#[from] openai_client::GenerationError),

    #[error("no competitor page yielded usable text and snippet-only briefs are disabled")]
    NoUsableContent,
}

impl BriefError {
    /// Message shown on the results form. Provider messages are carried
    /// verbatim for diagnosis.
    pub fn user_message(&self) -> String {
        use dataforseo_client::SerpError;
        match self {
            BriefError::Serp(SerpError::Auth) => {
                "DataForSEO rejected the credentials. Re-enter your login and password.".to_string()
            }
            BriefError::Serp(SerpError::Empty) => {
                "No organic results for this query. Try another keyword, locale or depth."
                    .to_string()
            }
            other => other.to_string(),
        }
    }
}
